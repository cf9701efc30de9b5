use std::sync::Arc;

use dense_matrix::{Error, Matrix, Multiplier, Shape};
use rand::Rng;

fn random_matrix(width: usize, height: usize) -> Matrix<i64> {
    let mut rng = rand::thread_rng();
    let rows = (0..height)
        .map(|_| (0..width).map(|_| rng.gen_range(-100..=100)).collect())
        .collect();
    Matrix::from_rows(width, height, rows).unwrap()
}

fn sample_a() -> Matrix<i32> {
    Matrix::from_rows(3, 2, vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
}

fn sample_c() -> Matrix<i32> {
    Matrix::from_rows(
        4,
        3,
        vec![vec![1, 1, 0, 0], vec![2, 1, 0, 1], vec![3, 1, 1, 0]],
    )
    .unwrap()
}

#[test]
fn test_multiply_by() {
    let product = sample_a().multiply_by(&sample_c()).unwrap();

    assert_eq!(product.width(), 4);
    assert_eq!(product.height(), 2);
    assert_eq!(
        product.into_rows(),
        vec![vec![14, 6, 3, 2], vec![32, 15, 6, 5]]
    );
}

#[test]
fn test_multiply_square_floats() {
    let a = Matrix::from_rows(2, 2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = Matrix::from_rows(2, 2, vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();

    let product = a.multiply_by(&b).unwrap();
    assert_eq!(product.into_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
}

#[test]
fn test_multiply_dimension_mismatch() {
    let err = sample_c().multiply_by(&sample_a()).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "Incompatible matrix dimensions: this [4, 3], other [3, 2]"
    );

    let err = sample_c().multiply_sequential(&sample_a()).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[test]
fn test_multiply_empty() {
    let a = Matrix::<f64>::new(0, 0);
    let product = a.multiply_by(&a).unwrap();
    assert_eq!(product.shape(), Shape::new(0, 0));
}

#[test]
fn test_multiply_zero_inner_dimension() {
    let a = Matrix::<i32>::new(0, 3);
    let b = Matrix::<i32>::new(2, 0);

    let product = a.multiply_by(&b).unwrap();
    assert_eq!(product, Matrix::new(2, 3));
}

#[test]
fn test_multiply_matches_sequential_reference() {
    let a = random_matrix(13, 9);
    let b = random_matrix(21, 13);

    let product = a.multiply_by(&b).unwrap();
    assert_eq!(product.shape(), Shape::new(21, 9));
    assert_eq!(product, a.multiply_sequential(&b).unwrap());
}

#[test]
fn test_result_independent_of_worker_count() {
    let a = random_matrix(30, 40);
    let b = random_matrix(25, 30);

    let single = Multiplier::new().with_workers(1).multiply_blocking(&a, &b).unwrap();
    let many = Multiplier::new().with_workers(8).multiply_blocking(&a, &b).unwrap();
    assert_eq!(single, many);
}

#[test]
fn test_unsigned_multiply() {
    let a = Matrix::<u32>::from_rows(2, 1, vec![vec![3, 4]]).unwrap();
    let b = Matrix::<u32>::from_rows(1, 2, vec![vec![5], vec![6]]).unwrap();
    assert_eq!(a.multiply_by(&b).unwrap().into_rows(), vec![vec![39]]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multiply_inside_runtime() {
    let product = Multiplier::new()
        .multiply(&sample_a(), &sample_c())
        .await
        .unwrap();
    assert_eq!(
        product.into_rows(),
        vec![vec![14, 6, 3, 2], vec![32, 15, 6, 5]]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tiny_queues() {
    let a = random_matrix(17, 11);
    let b = random_matrix(5, 17);

    let product = Multiplier::new()
        .with_workers(3)
        .with_batch_size(1)
        .multiply(&a, &b)
        .await
        .unwrap();
    assert_eq!(product, a.multiply_sequential(&b).unwrap());
}

#[test]
fn test_stress_large_matrices() {
    let engine = Multiplier::new().with_workers(16);
    for _ in 0..3 {
        let a = random_matrix(200, 200);
        let b = random_matrix(200, 200);

        let product = engine.multiply_blocking(&a, &b).unwrap();
        assert_eq!(product, a.multiply_sequential(&b).unwrap());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_multiply_by_from_multi_thread_runtime() {
    let product = sample_a().multiply_by(&sample_c()).unwrap();
    assert_eq!(
        product.into_rows(),
        vec![vec![14, 6, 3, 2], vec![32, 15, 6, 5]]
    );
}

#[tokio::test]
async fn test_multiply_by_from_current_thread_runtime() {
    let a = random_matrix(12, 7);
    let b = random_matrix(9, 12);

    let product = a.multiply_by(&b).unwrap();
    assert_eq!(product, a.multiply_sequential(&b).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multiply_shared_operands() {
    let a = Arc::new(random_matrix(40, 30));
    let b = Arc::new(random_matrix(20, 40));

    let product = Multiplier::new()
        .multiply_shared(Arc::clone(&a), Arc::clone(&b))
        .await
        .unwrap();
    assert_eq!(product, a.multiply_sequential(&b).unwrap());

    let err = Multiplier::new().multiply_shared(b, a).await.unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[cfg(debug_assertions)]
#[test]
fn test_worker_panic_is_reported() {
    let a = Matrix::<i8>::from_rows(1, 1, vec![vec![100]]).unwrap();

    let err = Multiplier::new()
        .with_workers(2)
        .multiply_blocking(&a, &a)
        .unwrap_err();
    assert!(matches!(err, Error::Worker(_)));
    assert!(err.to_string().starts_with("worker task failed"));
}
