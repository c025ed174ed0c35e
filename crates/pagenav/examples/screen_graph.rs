//! Screen Graph Demo - Fluent Page-Object Navigation
//!
//! Walks a small settings application (a screen, a dialog and a dropdown)
//! against the in-memory mock driver and prints the interaction log.
//!
//! # Running
//!
//! ```bash
//! PAGENAV_LOG=pagenav=debug cargo run --example screen_graph -p pagenav
//! ```

use pagenav::logging::init_test_logging;
use pagenav::mock::{Effect, MockDriver, MockElement};
use pagenav::prelude::*;

fn main() -> NavResult<()> {
    init_test_logging();
    println!("=== Pagenav Screen Graph Demo ===\n");

    let driver = settings_app();
    let session = Session::new(driver.clone()).with_config(NavConfig::from_yaml_str(
        "timeout_ms: 500\npoll_interval_ms: 10\n",
    )?)?;

    let settings: Screen = NodeBuilder::new(session, "Settings")
        .within(Selector::css("main"))
        .control(ControlId::Name, Resolver::css("input.display-name"))
        .control(ControlId::Delete, Resolver::css("button.delete"))
        .build()?
        .into();

    let confirm_delete = PopupConfig::new("ConfirmDelete", Selector::css("[role=alertdialog]"))
        .control(ControlId::Ok, Resolver::css("button.yes"))
        .control(ControlId::Cancel, Resolver::css("button.no"));

    let theme = ComboboxConfig::new("Theme", Selector::css(".theme"), Selector::css(".menu"));

    let settings = settings
        .set_value(ControlId::Name, "Ada")?
        .open_combobox(theme)?
        .set("Dark")?
        .close()?
        .open_popup(ControlId::Delete, confirm_delete)?
        .cancel()?;

    println!("Back on: {}", settings.name());
    println!("Display name: {:?}", driver.value("display-name"));
    println!("\nInteractions:");
    for interaction in driver.interactions() {
        println!("  {:<14} {:?}", interaction.element, interaction.action);
    }

    Ok(())
}

fn settings_app() -> MockDriver {
    let driver = MockDriver::new();
    driver.add(MockElement::new("settings", "main").matching(Selector::css("main")));
    driver.add(
        MockElement::new("display-name", "input")
            .child_of("settings")
            .matching(Selector::css("input.display-name")),
    );
    driver.add(
        MockElement::new("delete", "button")
            .child_of("settings")
            .matching(Selector::css("button.delete")),
    );
    driver.add(
        MockElement::new("theme", "div")
            .child_of("settings")
            .matching(Selector::css(".theme")),
    );
    driver.add(
        MockElement::new("theme-toggle", "button")
            .child_of("theme")
            .matching(Selector::css(DEFAULT_TOGGLE_SELECTOR)),
    );

    driver.add(
        MockElement::new("theme-menu", "ul")
            .matching(Selector::css(".menu"))
            .visible(false),
    );
    for option in ["Light", "Dark"] {
        driver.add(
            MockElement::new(format!("theme-{option}"), "li")
                .child_of("theme-menu")
                .matching(Selector::css(DEFAULT_OPTION_SELECTOR))
                .text(option),
        );
        driver.on_click(format!("theme-{option}"), Effect::Hide("theme-menu".into()));
    }
    driver.on_click("theme-toggle", Effect::Show("theme-menu".into()));

    driver.add(
        MockElement::new("confirm", "div")
            .matching(Selector::css("[role=alertdialog]"))
            .visible(false),
    );
    for (id, css) in [("yes", "button.yes"), ("no", "button.no")] {
        driver.add(
            MockElement::new(id, "button")
                .child_of("confirm")
                .matching(Selector::css(css)),
        );
    }
    driver.on_click("delete", Effect::Show("confirm".into()));
    driver.on_click("no", Effect::Hide("confirm".into()));

    driver
}
