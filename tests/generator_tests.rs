use std::fs;
use std::path::Path;
use typereg::generator::{generate, CapabilityConfig, Config};
use typereg::TypeRegError;

const FIXTURE_LIB: &str = r#"
/// Person represents a person and their attributes.
/// ki:flagtype NodeFlags -field Flag
/// typereg:embedder
pub struct Person {
    /// Name is the name of the person.
    pub name: String,
    /// Age is the age of the person.
    #[typereg(set = "-")]
    pub age: i32,
    #[typereg(set = "nickname")]
    pub nick: String,
    #[typereg(embed)]
    pub style: Style,
}

/// Style holds presentation attributes.
pub struct Style {
    pub color: String,
    pub weight: i32,
    pub size: f32,
    pub visible: bool,
}

impl Person {
    /// Introduction returns an introduction for the person.
    pub fn introduction(&self) -> String {
        self.name.clone()
    }
}

/// Alert prints an alert with the given message.
pub fn alert(msg: String) {
    let _ = msg;
}

/// Maximum number of tracked people.
pub const MAX_PEOPLE: usize = 64;

pub static DEFAULT_NAME: &str = "unknown";
"#;

fn write_fixture(dir: &Path) -> String {
    fs::write(
        dir.join("Cargo.toml"),
        "[package]\nname = \"fixture-crate\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("lib.rs"), FIXTURE_LIB).unwrap();
    src.to_string_lossy().to_string()
}

fn base_config(src: &str) -> Config {
    Config {
        source_dir: src.to_string(),
        setters: true,
        ..Config::default()
    }
}

#[test]
fn test_end_to_end_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let out = generate(&base_config(&src)).unwrap();
    let output = fs::read_to_string(&out).unwrap();

    // Exactly one registration block per type, in declaration order.
    assert_eq!(output.matches("registry.add_type(TypeInfo {").count(), 2);
    assert_eq!(output.matches(r#"name: "fixture_crate::Person".into(),"#).count(), 1);
    assert!(output.contains(r#"id_name: "person".into(),"#));

    // Both directives, in source order.
    assert!(output.contains(
        r#"Directive::new("ki", "flagtype", &["NodeFlags", "-field", "Flag"])"#
    ));
    assert!(output.contains(r#"Directive::new("typereg", "embedder", &[])"#));

    // The zero-arg, one-string-return method appears in the methods map.
    assert_eq!(output.matches(r#"("introduction", Method {"#).count(), 1);

    // Declared and embedded fields are listed in declaration order.
    assert!(output.contains(r#"("style", Field {"#));
    assert!(output.contains(r#"type_name: "fixture_crate::Style".into()"#));

    // Setters for Person: two eligible declared fields, four flattened
    // embedded fields, none for the opted-out field.
    let person_impl_start = output.find("impl Person {").unwrap();
    let style_impl_start = output.find("impl Style {").unwrap();
    let person_impl = &output[person_impl_start..style_impl_start];
    assert_eq!(person_impl.matches("pub fn set_").count(), 6);
    assert!(person_impl.contains("pub fn set_name(&mut self, v: String) -> &mut Self"));
    assert!(person_impl.contains("pub fn set_nickname(&mut self, v: String) -> &mut Self"));
    assert!(person_impl.contains("self.nick = v;"));
    assert!(person_impl.contains("self.style.color = v;"));
    assert!(person_impl.contains("self.style.weight = v;"));
    assert!(person_impl.contains("self.style.size = v;"));
    assert!(person_impl.contains("self.style.visible = v;"));
    assert!(!output.contains("set_age"));

    // No instance or handle static unless configured.
    assert!(!output.contains("PERSON_TYPE"));
    assert!(!output.contains("Box::new(Person::default())"));
}

#[test]
fn test_generation_is_idempotent_after_first_line() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let out = generate(&base_config(&src)).unwrap();
    let first = fs::read_to_string(&out).unwrap();
    let out = generate(&base_config(&src)).unwrap();
    let second = fs::read_to_string(&out).unwrap();

    let (_, first_rest) = first.split_once('\n').unwrap();
    let (_, second_rest) = second.split_once('\n').unwrap();
    assert_eq!(first_rest, second_rest);
}

#[test]
fn test_generated_file_marker() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let out = generate(&base_config(&src)).unwrap();
    let output = fs::read_to_string(&out).unwrap();
    let first_line = output.lines().next().unwrap();
    assert!(first_line.starts_with("// Code generated by"));
    assert!(first_line.ends_with("DO NOT EDIT."));
}

#[test]
fn test_setters_disabled_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let config = Config {
        source_dir: src,
        ..Config::default()
    };
    let out = generate(&config).unwrap();
    let output = fs::read_to_string(&out).unwrap();
    assert!(!output.contains("pub fn set_"));
}

#[test]
fn test_instance_and_type_var_toggles() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let config = Config {
        source_dir: src,
        instance: true,
        type_var: true,
        ..Config::default()
    };
    let out = generate(&config).unwrap();
    let output = fs::read_to_string(&out).unwrap();
    assert!(output.contains("pub static PERSON_TYPE: OnceCell<Arc<TypeInfo>> = OnceCell::new();"));
    assert!(output.contains("pub static STYLE_TYPE: OnceCell<Arc<TypeInfo>> = OnceCell::new();"));
    assert!(output.contains("instance: Some(Box::new(Person::default()))"));
    assert!(output.contains("let _ = PERSON_TYPE.set(ty);"));
}

#[test]
fn test_func_var_const_registration_toggles() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let config = Config {
        source_dir: src,
        funcs: true,
        vars: true,
        consts: true,
        ..Config::default()
    };
    let out = generate(&config).unwrap();
    let output = fs::read_to_string(&out).unwrap();
    assert!(output.contains(r#"registry.add_func(Func { name: "fixture_crate::alert".into()"#));
    assert!(output.contains(r#"name: "msg".into()"#));
    assert!(output.contains(r#"registry.add_var(Variable { name: "fixture_crate::DEFAULT_NAME".into()"#));
    assert!(output.contains(r#"registry.add_const(Variable { name: "fixture_crate::MAX_PEOPLE".into()"#));
}

#[test]
fn test_capability_templates_gate_on_method_set() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let mut config = Config {
        source_dir: src,
        ..Config::default()
    };
    config.capabilities.insert(
        "display".to_string(),
        CapabilityConfig {
            methods: vec!["introduction() -> String".to_string()],
            templates: vec![
                "impl std::fmt::Display for {{ ident }} {\n    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {\n        f.write_str(&self.introduction())\n    }\n}"
                    .to_string(),
            ],
            config: Config {
                instance: true,
                type_var: true,
                setters: true,
                ..Config::default()
            },
        },
    );

    let out = generate(&config).unwrap();
    let output = fs::read_to_string(&out).unwrap();

    // Person satisfies the capability: extra block plus the nested toggles.
    assert!(output.contains("impl std::fmt::Display for Person"));
    assert!(output.contains("pub static PERSON_TYPE"));
    assert!(output.contains("Box::new(Person::default())"));
    assert!(output.contains("impl Person {"));

    // Style is missing the required method: no extra block, base toggles.
    assert!(!output.contains("impl std::fmt::Display for Style"));
    assert!(!output.contains("STYLE_TYPE"));
    assert!(!output.contains("Box::new(Style::default())"));
    assert!(!output.contains("impl Style {"));
}

#[test]
fn test_template_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());

    let mut config = Config {
        source_dir: src.clone(),
        ..Config::default()
    };
    config.capabilities.insert(
        "broken".to_string(),
        CapabilityConfig {
            methods: vec!["introduction() -> String".to_string()],
            templates: vec!["{{ ident|no_such_filter }}".to_string()],
            ..Default::default()
        },
    );

    let err = generate(&config).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, TypeRegError::TemplateRender { .. }));
    assert!(message.contains("fixture_crate::Person"));
    assert!(!Path::new(&src).join("typereg_gen.rs").exists());
}

#[test]
fn test_invalid_configuration_reported_before_extraction() {
    let config = Config {
        source_dir: String::new(),
        ..Config::default()
    };
    assert!(matches!(generate(&config), Err(TypeRegError::Config(_))));

    let mut config = Config::default();
    config.capabilities.insert(
        "bad".to_string(),
        CapabilityConfig {
            methods: vec!["not a signature".to_string()],
            ..Default::default()
        },
    );
    assert!(matches!(generate(&config), Err(TypeRegError::Config(_))));
}

#[test]
fn test_wildcard_source_dir_output_location() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path());
    let nested = Path::new(&src).join("widgets");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("button.rs"), "pub struct Button { pub label: String }\n").unwrap();

    let config = Config {
        source_dir: format!("{src}/..."),
        ..Config::default()
    };
    let out = generate(&config).unwrap();
    // Output lands at the scan root, not inside the wildcard.
    assert_eq!(out, Path::new(&src).join("typereg_gen.rs"));
    let output = fs::read_to_string(&out).unwrap();
    assert!(output.contains(r#"name: "fixture_crate::widgets::button::Button".into(),"#));
}
