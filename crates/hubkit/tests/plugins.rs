//! Link-time plugin discovery through `inventory`.

use hubkit::{ComponentClass, Hub, PluginEntry};

fn make_search() -> ComponentClass {
    ComponentClass::named("SearchIndex").doc("Full-text search")
}

fn make_thumbnails() -> ComponentClass {
    ComponentClass::named("Thumbnails")
}

fn make_unrelated() -> ComponentClass {
    ComponentClass::named("Unrelated")
}

hubkit::inventory::submit! {
    PluginEntry::new("media.plugins", make_search)
}

hubkit::inventory::submit! {
    PluginEntry::new("media.plugins", make_thumbnails)
}

hubkit::inventory::submit! {
    PluginEntry::new("other.plugins", make_unrelated)
}

#[test]
fn test_discover_registers_group_members() {
    let mut hub = Hub::new();
    let mut names = hub.discover_components("media.plugins", Some("media")).unwrap();
    names.sort();

    assert_eq!(names, vec!["SearchIndex", "Thumbnails"]);
    assert!(hub.get_component("Unrelated", None).is_none());
    assert_eq!(
        hub.component_info("SearchIndex", Some("media"))
            .and_then(|info| info.description.as_deref()),
        Some("Full-text search")
    );
}

#[test]
fn test_rediscovery_skips_existing() {
    let mut hub = Hub::new();
    hub.discover_components("media.plugins", None).unwrap();

    let again = hub.discover_components("media.plugins", None).unwrap();
    assert!(again.is_empty());
    assert_eq!(hub.list_components(None).len(), 2);
}

#[test]
fn test_unknown_group_is_empty() {
    let mut hub = Hub::new();
    assert!(hub.discover_components("nope", None).unwrap().is_empty());
}
