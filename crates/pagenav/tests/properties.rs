//! Property tests for the dismiss guard, popup identity and registry merge.

#![allow(clippy::unwrap_used)]

use pagenav::mock::{Effect, MockDriver, MockElement};
use pagenav::prelude::*;
use proptest::prelude::*;

fn session(driver: &MockDriver) -> Session {
    Session::new(driver.clone())
        .with_config(NavConfig::new().with_timeout(50).with_poll_interval(5))
        .unwrap()
}

fn widget(driver: &MockDriver) -> Combobox<Screen> {
    driver.add(MockElement::new("picker", "div").matching(Selector::css(".picker")));
    driver.add(
        MockElement::new("toggle", "button")
            .child_of("picker")
            .matching(Selector::css(DEFAULT_TOGGLE_SELECTOR)),
    );
    driver.add(MockElement::new("panel", "ul").matching(Selector::css(".menu")));
    driver.add(
        MockElement::new("pick", "li")
            .child_of("panel")
            .matching(Selector::css(DEFAULT_OPTION_SELECTOR))
            .text("Pick"),
    );
    driver.on_click("pick", Effect::Hide("panel".into()));

    let screen = NodeBuilder::new(session(driver), "Host")
        .build()
        .map(Screen::from)
        .unwrap();
    Combobox::attach(
        screen,
        ComboboxConfig::new("Picker", Selector::css(".picker"), Selector::css(".menu")),
    )
    .unwrap()
}

const IDS: [ControlId; 8] = [
    ControlId::Name,
    ControlId::Search,
    ControlId::Ok,
    ControlId::Cancel,
    ControlId::Save,
    ControlId::Create,
    ControlId::Delete,
    ControlId::Close,
];

fn registry(owner: &str, ids: &[usize], tag: &str) -> ControlRegistry {
    ids.iter().fold(ControlRegistry::new(owner, Scope::Root), |reg, &i| {
        reg.with(IDS[i], Resolver::css(format!("{tag}-{i}")))
    })
}

fn css_of(reg: &ControlRegistry, id: ControlId) -> Option<String> {
    match reg.resolver(id) {
        Some(Resolver::Scoped(Selector::Css(css))) => Some(css.clone()),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_collapse_clicks_toggle_at_most_once(calls in 1usize..10) {
        let driver = MockDriver::new();
        let mut combobox = widget(&driver);
        let issued = (0..calls).filter(|_| combobox.collapse().unwrap()).count();
        let _ = combobox.close().unwrap();
        prop_assert_eq!(issued, 1);
        prop_assert_eq!(driver.clicks("toggle"), 1);
    }

    #[test]
    fn prop_set_then_close_never_clicks_toggle(extra_collapses in 0usize..5) {
        let driver = MockDriver::new();
        let mut combobox = widget(&driver).set("Pick").unwrap();
        for _ in 0..extra_collapses {
            prop_assert!(!combobox.collapse().unwrap());
        }
        let _ = combobox.close().unwrap();
        prop_assert_eq!(driver.clicks("toggle"), 0);
        prop_assert_eq!(driver.clicks("pick"), 1);
    }

    #[test]
    fn prop_merge_keeps_non_overridden_entries(
        base_ids in proptest::collection::btree_set(0usize..IDS.len(), 0..IDS.len()),
        own_ids in proptest::collection::btree_set(0usize..IDS.len(), 0..IDS.len()),
    ) {
        let base_ids: Vec<_> = base_ids.into_iter().collect();
        let own_ids: Vec<_> = own_ids.into_iter().collect();
        let base = registry("Base", &base_ids, "base");
        let own = registry("Own", &own_ids, "own");
        let merged = ControlRegistry::merge(&base, own.clone());

        let driver = MockDriver::new();
        for i in 0..IDS.len() {
            for tag in ["base", "own"] {
                let css = format!("{tag}-{i}");
                driver.add(MockElement::new(css.clone(), "button").matching(Selector::css(css)));
            }
        }
        let session = session(&driver);

        for (i, id) in IDS.iter().enumerate() {
            let (expected, source) = if own_ids.contains(&i) {
                (css_of(&own, *id), &own)
            } else {
                (css_of(&base, *id), &base)
            };
            prop_assert_eq!(css_of(&merged, *id), expected);
            if merged.contains(*id) {
                let live = merged.get(&session, *id).unwrap().id;
                prop_assert_eq!(live, source.get(&session, *id).unwrap().id);
            }
        }
        prop_assert_eq!(merged.owner(), "Own");
    }

    #[test]
    fn prop_unregistered_lookup_is_lookup_error(
        registered in proptest::collection::btree_set(0usize..IDS.len(), 0..IDS.len()),
        missing in 0usize..IDS.len(),
    ) {
        prop_assume!(!registered.contains(&missing));
        let ids: Vec<_> = registered.into_iter().collect();
        let driver = MockDriver::new();
        let err = registry("Form", &ids, "css").get(&session(&driver), IDS[missing]).unwrap_err();
        let is_unregistered = matches!(
            err,
            NavError::Lookup { reason: pagenav::LookupReason::Unregistered, .. }
        );
        prop_assert!(is_unregistered);
    }

    #[test]
    fn prop_popup_returns_constructed_parent(confirm in any::<bool>()) {
        let driver = MockDriver::new();
        driver.add(MockElement::new("dialog", "div").matching(Selector::css("[role=dialog]")));
        driver.add(
            MockElement::new("ok", "button").child_of("dialog").matching(Selector::css(".ok")),
        );
        driver.add(
            MockElement::new("cancel", "button")
                .child_of("dialog")
                .matching(Selector::css(".cancel")),
        );
        let parent = NodeBuilder::new(session(&driver), "Host")
            .build()
            .map(Screen::from)
            .unwrap();
        let parent_id = parent.id();
        let popup = Popup::attach(
            parent,
            PopupConfig::new("Confirm", Selector::css("[role=dialog]"))
                .control(ControlId::Ok, Resolver::css(".ok"))
                .control(ControlId::Cancel, Resolver::css(".cancel")),
        )
        .unwrap();

        let back = if confirm { popup.ok() } else { popup.cancel() }.unwrap();
        prop_assert_eq!(back.id(), parent_id);
        prop_assert_eq!(driver.clicks("ok") + driver.clicks("cancel"), 1);
    }
}
