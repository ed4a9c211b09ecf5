//! Property-based tests for Hub registration using proptest.

use std::collections::BTreeSet;

use clap::Command;
use hubkit::{CommandSpec, ComponentClass, ComponentOptions, Hub};
use proptest::prelude::*;

proptest! {
    /// A registered component is found under its type name, in its dimension.
    #[test]
    fn component_registration_round_trips(
        type_name in "[A-Z][A-Za-z0-9_]{0,12}",
        dimension in "[a-z]{1,8}",
    ) {
        prop_assume!(dimension != "command");

        let mut hub = Hub::new();
        let name = hub
            .add_component_with(
                ComponentClass::named(type_name.as_str()),
                ComponentOptions::new().dimension(dimension.as_str()),
            )
            .unwrap();

        prop_assert_eq!(&name, &type_name);
        let record = hub.get_component(&name, Some(&dimension)).unwrap();
        prop_assert_eq!(record.info().type_name.as_str(), type_name.as_str());
        prop_assert!(hub.get_component(&name, None).is_some());
        prop_assert_eq!(hub.list_components(Some(&dimension)), vec![name]);
    }

    /// Registering the same type twice fails and keeps exactly one entry.
    #[test]
    fn duplicate_components_rejected(names in prop::collection::vec("[A-Z][a-z]{0,6}", 1..8)) {
        let mut hub = Hub::new();
        let mut seen = BTreeSet::new();

        for name in &names {
            let result = hub.add_component(ComponentClass::named(name.as_str()));
            if seen.insert(name.clone()) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.unwrap_err().is_already_exists());
            }
        }

        prop_assert_eq!(hub.components().len(), seen.len());
    }

    /// Commands are reachable under every alias, hidden ones included.
    #[test]
    fn command_aliases_resolve(
        name in "[a-z]{3,8}",
        visible in "v[a-z]{1,4}",
        hidden in "h[a-z]{1,4}",
    ) {
        prop_assume!(name != "help" && hidden != "help");
        prop_assume!(name != visible && name != hidden);

        let mut hub = Hub::new();
        hub.add_command(CommandSpec::from_clap(
            Command::new(name.clone()).visible_alias(visible.clone()).alias(hidden.clone()),
        ))
        .unwrap();

        for key in [&name, &visible, &hidden] {
            prop_assert_eq!(hub.command_info(key).unwrap().name.as_str(), name.as_str());
        }
        prop_assert_eq!(&hub.command_info(&name).unwrap().aliases, &vec![visible]);
        prop_assert!(hub
            .add_command(CommandSpec::from_clap(Command::new(hidden)))
            .unwrap_err()
            .is_already_exists());
    }
}
