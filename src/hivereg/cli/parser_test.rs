// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::hivereg::cli::parser::parse_command;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic_command() {
        let cmd = parse_command(args(&["value:set", "HKLM\\Software", "name", "data"])).unwrap();
        assert_eq!(cmd.namespace, "value");
        assert_eq!(cmd.action, "set");
        assert_eq!(cmd.args, vec!["HKLM\\Software", "name", "data"]);
        assert!(cmd.flags.is_empty());
    }

    #[test]
    fn test_parse_value_flag() {
        let cmd = parse_command(args(&["key:create", "HKLM\\X", "--class", "Shell"])).unwrap();
        assert_eq!(cmd.flag("class"), Some("Shell"));
    }

    #[test]
    fn test_parse_boolean_flags() {
        let cmd = parse_command(args(&["key:list", "HKLM", "--json", "--volatile"])).unwrap();
        assert!(cmd.is_set("json"));
        assert!(cmd.is_set("volatile"));
        assert!(!cmd.is_set("v1"));
    }

    #[test]
    fn test_parse_short_flag() {
        let cmd = parse_command(args(&["key:list", "HKLM", "-h"])).unwrap();
        assert!(cmd.is_set("h"));
    }

    #[test]
    fn test_empty_args_rejected() {
        assert!(parse_command(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_colon_rejected() {
        assert!(parse_command(args(&["keycreate"])).is_err());
        assert!(parse_command(args(&["key:create:extra"])).is_err());
    }

    #[test]
    fn test_empty_namespace_or_action_rejected() {
        assert!(parse_command(args(&[":create"])).is_err());
        assert!(parse_command(args(&["key:"])).is_err());
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        assert!(parse_command(args(&["key!:create"])).is_err());
    }

    #[test]
    fn test_value_flag_requires_value() {
        assert!(parse_command(args(&["key:create", "--class"])).is_err());
    }

    #[test]
    fn test_value_flag_rejects_dashed_value() {
        // A dash after a value flag is a forgotten value, not a value.
        assert!(parse_command(args(&["key:create", "X", "--class", "-foo"])).is_err());
        assert!(parse_command(args(&["key:create", "X", "--class", "--json"])).is_err());
    }

    #[test]
    fn test_bare_double_dash_rejected() {
        assert!(parse_command(args(&["key:list", "HKLM", "--"])).is_err());
    }

    #[test]
    fn test_flag_ordering_mixed_with_args() {
        let cmd = parse_command(args(&[
            "value:set",
            "HKLM\\A",
            "--type",
            "dword",
            "name",
            "1",
        ]))
        .unwrap();
        assert_eq!(cmd.args, vec!["HKLM\\A", "name", "1"]);
        assert_eq!(cmd.flag("type"), Some("dword"));
    }
}
