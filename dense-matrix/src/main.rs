use std::env;
use std::time::Instant;

use dense_matrix::{Matrix, Multiplier};
use rand::Rng;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).cloned().unwrap_or_else(|| "demo".to_string());

    match mode.as_str() {
        "demo" => demo().await?,
        "multiply" => {
            let m: usize = args.get(2).unwrap_or(&"200".to_string()).parse()?;
            let n: usize = args.get(3).unwrap_or(&"200".to_string()).parse()?;
            let p: usize = args.get(4).unwrap_or(&"200".to_string()).parse()?;
            let mut engine = Multiplier::new();
            if let Some(workers) = args.get(5) {
                engine = engine.with_workers(workers.parse()?);
            }

            let a = random_matrix(n, m)?;
            let b = random_matrix(p, n)?;
            println!(
                "Multiplying {}x{} by {}x{} with {} workers",
                m,
                n,
                n,
                p,
                engine.workers()
            );

            let started = Instant::now();
            let product = engine.multiply(&a, &b).await?;
            println!("Concurrent: {:?}", started.elapsed());

            let started = Instant::now();
            let reference = a.multiply_sequential(&b)?;
            println!("Sequential: {:?}", started.elapsed());

            if product == reference {
                println!("Result {} matches the sequential product", product.shape());
            } else {
                eprintln!("Result differs from the sequential product");
                std::process::exit(2);
            }
        }
        _ => {
            eprintln!("Unknown mode: {}", mode);
            eprintln!("Usage: {} <mode> [args...]", args[0]);
            eprintln!("Modes:");
            eprintln!("  demo                        - Run the worked examples (default)");
            eprintln!("  multiply <m> <n> <p> [w]    - Multiply random m×n and n×p matrices");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn demo() -> Result<(), dense_matrix::Error> {
    let a = Matrix::from_rows(3, 2, vec![vec![1, 2, 3], vec![4, 5, 6]])?;
    let b = Matrix::from_rows(3, 2, vec![vec![2, 2, 2], vec![2, 2, 2]])?;
    let c = Matrix::from_rows(
        4,
        3,
        vec![vec![1, 1, 0, 0], vec![2, 1, 0, 1], vec![3, 1, 1, 0]],
    )?;

    print_matrix("A", &a);
    print_matrix("B", &b);
    print_matrix("C", &c);
    print_matrix("A + B", &a.add(&b)?);
    print_matrix("A - B", &a.minus(&b)?);
    print_matrix("-A", &-&a);
    print_matrix("A x C", &Multiplier::new().multiply(&a, &c).await?);

    match a.add(&c) {
        Ok(_) => println!("A + C unexpectedly succeeded"),
        Err(e) => println!("A + C: {}", e),
    }

    Ok(())
}

fn random_matrix(width: usize, height: usize) -> Result<Matrix<i64>, dense_matrix::Error> {
    let mut rng = rand::thread_rng();
    let rows = (0..height)
        .map(|_| (0..width).map(|_| rng.gen_range(-100..=100)).collect())
        .collect();
    Matrix::from_rows(width, height, rows)
}

fn print_matrix(name: &str, m: &Matrix<i64>) {
    println!("{} {}:", name, m.shape());
    for row in m.rows() {
        println!("  {:?}", row);
    }
}
