use indexmap::IndexMap;

use crate::io::{
    read_lines, read_qcutils_binary, read_qcutils_yaml, write_lines, write_qcutils_binary,
    write_qcutils_yaml, QCUtilsFileType,
};

fn temp_stem(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("qcutils_io_test_{name}_{}", std::process::id()))
}

#[test]
fn test_io_file_type_extensions() {
    assert_eq!(QCUtilsFileType::Cfg.ext(), "qcutils.cfg");
    assert_eq!(QCUtilsFileType::Pdf.ext(), "qcutils.pdf");
    assert_eq!(QCUtilsFileType::Rdm.ext(), "qcutils.rdm");
}

#[test]
fn test_io_yaml_preserves_irrep_order() {
    let stem = temp_stem("yaml");
    let irreps: IndexMap<String, usize> = [("B2", 1), ("A1", 3), ("B1", 2)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    write_qcutils_yaml(&stem, &irreps).unwrap();
    let path = stem.with_extension("yml");
    let read: IndexMap<String, usize> = read_qcutils_yaml(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(
        read.keys().cloned().collect::<Vec<_>>(),
        vec!["B2".to_string(), "A1".to_string(), "B1".to_string()]
    );
    assert_eq!(read, irreps);
}

#[test]
fn test_io_binary_round_trip() {
    let stem = temp_stem("binary");
    let value = vec!["2 0".to_string(), "a b".to_string()];
    write_qcutils_binary(&stem, QCUtilsFileType::Cfg, &value).unwrap();
    let read: Vec<String> = read_qcutils_binary(&stem, QCUtilsFileType::Cfg).unwrap();
    let mut path = stem.clone();
    path.set_extension(QCUtilsFileType::Cfg.ext());
    std::fs::remove_file(path).unwrap();
    assert_eq!(read, value);
}

#[test]
fn test_io_lines() {
    let path = temp_stem("lines").with_extension("txt");
    write_lines(&path, ["20", "ab", "ba"]).unwrap();
    let lines = read_lines(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(lines, vec!["20", "ab", "ba"]);
}

#[test]
fn test_io_missing_file() {
    assert!(read_lines(temp_stem("does_not_exist")).is_err());
}
