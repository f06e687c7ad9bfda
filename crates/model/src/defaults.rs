//! Built-in templates and sample content for an empty store

use crate::component::Component;
use crate::configuration::ComponentConfiguration;
use crate::module::Module;
use crate::page::Page;
use chrono::Utc;
use formkit_core::ComponentType;

/// The templates offered on first launch
///
/// Every call builds new identifiers, so the modules are never shared
/// between templates.
pub fn default_templates() -> Vec<Page> {
    vec![
        Page::new("Basic Profile")
            .as_template()
            .with_module(personal_module()),
        Page::new("Full Profile")
            .as_template()
            .with_module(personal_module())
            .with_module(contact_module())
            .with_module(preferences_module()),
        Page::new("Contact Form")
            .as_template()
            .with_module(contact_module()),
    ]
}

/// Example pages shown on first launch
pub fn default_pages() -> Vec<Page> {
    let sample = Module::new("Sample Module")
        .with_component(
            Component::new(ComponentType::Text, "Sample Text")
                .with_configuration(
                    ComponentConfiguration::new()
                        .required()
                        .with_placeholder("Enter text")
                        .with_helper_text("This is a sample text field"),
                )
                .with_value("Sample Value"),
        )
        .with_component(
            Component::new(ComponentType::Number, "Sample Number")
                .with_configuration(ComponentConfiguration::new().with_placeholder("Enter number"))
                .with_value(42),
        );

    vec![Page::new("Welcome Page").with_module(sample)]
}

fn personal_module() -> Module {
    Module::new("Personal Information")
        .with_component(
            Component::new(ComponentType::Text, "Full Name").with_configuration(
                ComponentConfiguration::new()
                    .required()
                    .with_placeholder("Enter your full name")
                    .with_helper_text("Your legal full name"),
            ),
        )
        .with_component(
            Component::new(ComponentType::Date, "Date of Birth")
                .with_configuration(
                    ComponentConfiguration::new()
                        .required()
                        .with_helper_text("Your date of birth"),
                )
                .with_value(Utc::now()),
        )
        .with_component(
            Component::new(ComponentType::Picker, "Gender")
                .with_configuration(ComponentConfiguration::new().with_picker_options([
                    "Male",
                    "Female",
                    "Non-binary",
                    "Prefer not to say",
                ]))
                .with_value("Prefer not to say"),
        )
}

fn contact_module() -> Module {
    Module::new("Contact Information")
        .with_component(
            Component::new(ComponentType::Text, "Email").with_configuration(
                ComponentConfiguration::new()
                    .required()
                    .with_placeholder("Enter your email")
                    .with_helper_text("Your primary email address"),
            ),
        )
        .with_component(
            Component::new(ComponentType::Text, "Phone").with_configuration(
                ComponentConfiguration::new()
                    .with_placeholder("Enter your phone number")
                    .with_helper_text("Your contact phone number"),
            ),
        )
        .with_component(
            Component::new(ComponentType::Picker, "Preferred Contact")
                .with_configuration(
                    ComponentConfiguration::new().with_picker_options(["Email", "Phone", "Either"]),
                )
                .with_value("Email"),
        )
}

fn preferences_module() -> Module {
    Module::new("Preferences")
        .with_component(
            Component::new(ComponentType::Toggle, "Receive Newsletter").with_configuration(
                ComponentConfiguration::new().with_helper_text("Subscribe to our newsletter"),
            ),
        )
        .with_component(
            Component::new(ComponentType::Toggle, "Email Notifications")
                .with_configuration(
                    ComponentConfiguration::new().with_helper_text("Receive email notifications"),
                )
                .with_value(true),
        )
}
