// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::hivereg::cli::key_commands::key_create;
    use crate::hivereg::cli::value_commands::{value_delete, value_get, value_list, value_set};
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    fn test_dir() -> PathBuf {
        let path = PathBuf::from(format!("/tmp/hive_test_{}", rand::random::<u32>()));
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn cleanup(path: &PathBuf) {
        let _ = fs::remove_dir_all(path);
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn dir_flags(dir: &PathBuf) -> HashMap<String, String> {
        let mut flags = HashMap::new();
        flags.insert("dir".to_string(), dir.to_string_lossy().to_string());
        flags
    }

    fn typed_flags(dir: &PathBuf, value_type: &str) -> HashMap<String, String> {
        let mut flags = dir_flags(dir);
        flags.insert("type".to_string(), value_type.to_string());
        flags
    }

    #[test]
    fn test_set_and_get_string_across_invocations() {
        let dir = test_dir();
        key_create(&args(&["HKCU\\App"]), &dir_flags(&dir)).unwrap();
        value_set(&args(&["HKCU\\App", "title", "Hello World"]), &dir_flags(&dir)).unwrap();

        let output = value_get(&args(&["HKCU\\App", "title"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("\"Hello World\""));
        assert!(output.contains("sz"));
        cleanup(&dir);
    }

    #[test]
    fn test_set_creates_key_store_on_demand() {
        let dir = test_dir();
        // No key:create first; the path must already exist for value:set.
        assert!(value_set(&args(&["HKCU\\Missing", "v", "x"]), &dir_flags(&dir)).is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_default_value_via_at_sign() {
        let dir = test_dir();
        key_create(&args(&["HKCR\\.txt"]), &dir_flags(&dir)).unwrap();
        value_set(&args(&["HKCR\\.txt", "@", "textfile"]), &dir_flags(&dir)).unwrap();

        let output = value_get(&args(&["HKCR\\.txt", "@"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("\"textfile\""));
        cleanup(&dir);
    }

    #[test]
    fn test_dword_round_trip() {
        let dir = test_dir();
        key_create(&args(&["HKLM\\Nums"]), &dir_flags(&dir)).unwrap();
        value_set(
            &args(&["HKLM\\Nums", "decimal", "123456"]),
            &typed_flags(&dir, "dword"),
        )
        .unwrap();
        value_set(
            &args(&["HKLM\\Nums", "hexed", "0x1e240"]),
            &typed_flags(&dir, "dword"),
        )
        .unwrap();

        let output = value_get(&args(&["HKLM\\Nums", "decimal"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("(123456)"));
        let output = value_get(&args(&["HKLM\\Nums", "hexed"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("0x0001e240"));
        cleanup(&dir);
    }

    #[test]
    fn test_multi_string_round_trip() {
        let dir = test_dir();
        key_create(&args(&["HKLM\\Multi"]), &dir_flags(&dir)).unwrap();
        value_set(
            &args(&["HKLM\\Multi", "paths", "one;two;three"]),
            &typed_flags(&dir, "multi"),
        )
        .unwrap();

        let output = value_get(&args(&["HKLM\\Multi", "paths"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("one;two;three"));
        assert!(output.contains("multi"));
        cleanup(&dir);
    }

    #[test]
    fn test_hex_round_trip() {
        let dir = test_dir();
        key_create(&args(&["HKLM\\Bin"]), &dir_flags(&dir)).unwrap();
        value_set(
            &args(&["HKLM\\Bin", "blob", "de,ad,be,ef"]),
            &typed_flags(&dir, "hex"),
        )
        .unwrap();

        let output = value_get(&args(&["HKLM\\Bin", "blob"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("de,ad,be,ef"));
        cleanup(&dir);
    }

    #[test]
    fn test_invalid_type_flag_rejected() {
        let dir = test_dir();
        key_create(&args(&["HKLM\\T"]), &dir_flags(&dir)).unwrap();
        assert!(value_set(
            &args(&["HKLM\\T", "v", "x"]),
            &typed_flags(&dir, "qword"),
        )
        .is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_value_list_sorted_and_delete() {
        let dir = test_dir();
        let flags = dir_flags(&dir);
        key_create(&args(&["HKLM\\L"]), &flags).unwrap();
        for name in ["zeta", "Alpha", "mid"] {
            value_set(&args(&["HKLM\\L", name, "x"]), &flags).unwrap();
        }

        let output = value_list(&args(&["HKLM\\L"]), &flags).unwrap();
        assert!(output.contains("3 values"));
        let alpha = output.find("Alpha").unwrap();
        let mid = output.find("mid").unwrap();
        let zeta = output.find("zeta").unwrap();
        assert!(alpha < mid && mid < zeta);

        value_delete(&args(&["HKLM\\L", "mid"]), &flags).unwrap();
        let output = value_list(&args(&["HKLM\\L"]), &flags).unwrap();
        assert!(output.contains("2 values"));
        assert!(!output.contains("mid"));

        // Deleting again fails: the value is gone from the store.
        assert!(value_delete(&args(&["HKLM\\L", "mid"]), &flags).is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_value_get_json_output() {
        let dir = test_dir();
        key_create(&args(&["HKLM\\J"]), &dir_flags(&dir)).unwrap();
        value_set(
            &args(&["HKLM\\J", "n", "7"]),
            &typed_flags(&dir, "dword"),
        )
        .unwrap();

        let mut json_flags = dir_flags(&dir);
        json_flags.insert("json".to_string(), "true".to_string());
        let output = value_get(&args(&["HKLM\\J", "n"]), &json_flags).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["value_type"], 4);
        assert_eq!(parsed["data"], serde_json::json!([7, 0, 0, 0]));
        cleanup(&dir);
    }
}
