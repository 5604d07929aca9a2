use ndarray::{array, Array4};

use crate::interfaces::binaries::{
    read_binary_array, read_f64_values, write_binary_array, ByteOrder, MatrixOrder,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "qcutils_binaries_test_{name}_{}.bin",
        std::process::id()
    ))
}

#[test]
fn test_interfaces_binaries_column_major() {
    let path = temp_path("colmajor");
    let m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    write_binary_array(&path, &m, ByteOrder::LittleEndian, MatrixOrder::ColMajor).unwrap();

    let raw = read_f64_values(&path, ByteOrder::LittleEndian).unwrap();
    assert_eq!(raw, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

    let read = read_binary_array(&path, (2, 3), ByteOrder::LittleEndian, MatrixOrder::ColMajor)
        .unwrap();
    assert_eq!(read, m);

    let read_as_row_major =
        read_binary_array(&path, (2, 3), ByteOrder::LittleEndian, MatrixOrder::RowMajor).unwrap();
    assert_eq!(read_as_row_major, array![[1.0, 4.0, 2.0], [5.0, 3.0, 6.0]]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_interfaces_binaries_big_endian_rank_four() {
    let path = temp_path("be4");
    let t = Array4::from_shape_fn((2, 2, 2, 2), |(p, q, r, s)| {
        (8 * p + 4 * q + 2 * r + s) as f64 * 0.5
    });
    write_binary_array(&path, &t, ByteOrder::BigEndian, MatrixOrder::RowMajor).unwrap();
    let read = read_binary_array(
        &path,
        (2, 2, 2, 2),
        ByteOrder::BigEndian,
        MatrixOrder::RowMajor,
    )
    .unwrap();
    assert_eq!(read, t);

    let raw = read_f64_values(&path, ByteOrder::BigEndian).unwrap();
    assert_eq!(raw[5], 2.5);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_interfaces_binaries_shape_mismatch() {
    let path = temp_path("mismatch");
    let m = array![[1.0, 2.0], [3.0, 4.0]];
    write_binary_array(&path, &m, ByteOrder::LittleEndian, MatrixOrder::RowMajor).unwrap();
    assert!(
        read_binary_array(&path, (3, 3), ByteOrder::LittleEndian, MatrixOrder::RowMajor).is_err()
    );
    std::fs::remove_file(&path).unwrap();

    assert!(read_f64_values(temp_path("missing"), ByteOrder::LittleEndian).is_err());
}
