// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::hivereg::cli::key_commands::{key_create, key_delete, key_info, key_list};
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

    #[test]
    fn test_key_create_and_list() {
        let dir = test_dir();
        let flags = dir_flags(&dir);

        let output = key_create(&args(&["HKLM\\Software\\App"]), &flags).unwrap();
        assert!(output.contains("created"));
        assert!(dir.join("hklm.reg").exists());

        // A second create finds it in the persisted store.
        let output = key_create(&args(&["HKLM\\Software\\App"]), &flags).unwrap();
        assert!(output.contains("already exists"));

        let output = key_list(&args(&["HKLM\\Software"]), &flags).unwrap();
        assert!(output.contains("App"));
        assert!(output.contains("1 subkeys"));

        cleanup(&dir);
    }

    #[test]
    fn test_key_create_requires_path() {
        let dir = test_dir();
        assert!(key_create(&[], &dir_flags(&dir)).is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_key_create_unknown_root_rejected() {
        let dir = test_dir();
        assert!(key_create(&args(&["HKXX\\Nope"]), &dir_flags(&dir)).is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_volatile_keys_do_not_persist() {
        let dir = test_dir();
        let mut flags = dir_flags(&dir);
        flags.insert("volatile".to_string(), "true".to_string());

        key_create(&args(&["HKLM\\Temp"]), &flags).unwrap();

        // The volatile key is gone after the store round trip.
        let output = key_list(&args(&["HKLM"]), &dir_flags(&dir)).unwrap();
        assert!(output.contains("0 subkeys"));
        cleanup(&dir);
    }

    #[test]
    fn test_key_delete_refuses_children_then_succeeds() {
        let dir = test_dir();
        let flags = dir_flags(&dir);
        key_create(&args(&["HKLM\\A\\B"]), &flags).unwrap();

        assert!(key_delete(&args(&["HKLM\\A"]), &flags).is_err());
        key_delete(&args(&["HKLM\\A\\B"]), &flags).unwrap();
        key_delete(&args(&["HKLM\\A"]), &flags).unwrap();

        let output = key_list(&args(&["HKLM"]), &flags).unwrap();
        assert!(output.contains("0 subkeys"));
        cleanup(&dir);
    }

    #[test]
    fn test_key_info_reports_counts() {
        let dir = test_dir();
        let flags = dir_flags(&dir);
        key_create(&args(&["HKLM\\Stats"]), &flags).unwrap();
        key_create(&args(&["HKLM\\Stats\\Sub"]), &flags).unwrap();

        let output = key_info(&args(&["HKLM\\Stats"]), &flags).unwrap();
        assert!(output.contains("Subkeys: 1"));
        assert!(output.contains("Values: 0"));
        assert!(output.contains("Modified: "));
        cleanup(&dir);
    }

    #[test]
    fn test_key_list_json_output() {
        let dir = test_dir();
        let flags = dir_flags(&dir);
        key_create(&args(&["HKLM\\JsonKey"]), &flags).unwrap();

        let mut json_flags = dir_flags(&dir);
        json_flags.insert("json".to_string(), "true".to_string());
        let output = key_list(&args(&["HKLM"]), &json_flags).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["name"], "JsonKey");
        cleanup(&dir);
    }
}
