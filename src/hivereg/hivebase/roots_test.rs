// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::hivereg::hivebase::{KeyFlags, Registry, RootKey};
    use crate::hivereg::hivestream::HiveError;
    use crate::hivereg::wide::WideString;

    #[test]
    fn test_roots_instantiate_lazily_and_once() {
        let mut reg = Registry::new();
        assert_eq!(reg.live_keys(), 0);

        let first = reg.root_key(RootKey::Users).unwrap();
        let second = reg.root_key(RootKey::Users).unwrap();
        assert_eq!(first, second);
        assert!(reg.key(first).flags.contains(KeyFlags::ROOT));
        assert!(reg.key(first).name.is_none());
        reg.release(first);
        reg.release(second);
    }

    #[test]
    fn test_all_seven_roots_have_canonical_names() {
        for root in RootKey::ALL {
            assert!(root.name().starts_with("HKEY_"));
            assert_eq!(RootKey::from_name(root.name()), Some(root));
        }
        assert_eq!(RootKey::from_name("HKEY_BOGUS"), None);
    }

    #[test]
    fn test_classes_root_aliases_machine_software_classes() {
        let mut reg = Registry::new();
        let classes = reg.root_key(RootKey::ClassesRoot).unwrap();

        let machine = reg.root_key(RootKey::LocalMachine).unwrap();
        let resolved = reg
            .open_key(machine, &WideString::from("SOFTWARE\\Classes"))
            .unwrap();
        assert_eq!(classes, resolved);
        assert!(reg.key(classes).flags.contains(KeyFlags::ROOT));
        // The alias hangs off the machine tree, so it has a parent.
        assert!(reg.key(classes).parent.is_some());
        reg.release(resolved);
        reg.release(machine);
        reg.release(classes);
    }

    #[test]
    fn test_root_cannot_be_deleted_through_alias_path() {
        let mut reg = Registry::new();
        let classes = reg.root_key(RootKey::ClassesRoot).unwrap();
        reg.release(classes);

        let machine = reg.root_key(RootKey::LocalMachine).unwrap();
        assert!(matches!(
            reg.delete_key(machine, &WideString::from("SOFTWARE\\Classes")),
            Err(HiveError::AccessDenied { .. })
        ));
        reg.release(machine);
    }

    #[test]
    fn test_set_levels_rejects_unknown_version() {
        let mut reg = Registry::new();
        assert!(reg.set_levels(0, 0, 3).is_err());
        assert!(reg.set_levels(1, 1, 1).is_ok());
        assert_eq!(reg.current_level(), 1);
        assert_eq!(reg.saving_level(), 1);
        assert_eq!(reg.saving_version(), 1);
    }

    #[test]
    fn test_close_releases_all_roots() {
        let mut reg = Registry::new();
        for root in [RootKey::LocalMachine, RootKey::CurrentUser, RootKey::DynData] {
            let id = reg.root_key(root).unwrap();
            reg.release(id);
        }
        assert!(reg.live_keys() > 0);
        reg.close();
        assert_eq!(reg.live_keys(), 0);
    }
}
