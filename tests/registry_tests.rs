use typereg::registry::{ordered, Field, Func, Registry, TypeInfo};
use typereg::TypeRegError;

fn embed_field(name: &str, type_name: &str) -> Field {
    Field {
        name: name.to_string(),
        type_name: type_name.to_string(),
        local_type: type_name.rsplit("::").next().unwrap().to_string(),
        tag: "embed".to_string(),
        ..Default::default()
    }
}

fn simple_type(name: &str, embeds: &[(&str, &str)]) -> TypeInfo {
    TypeInfo {
        name: name.to_string(),
        short_name: name.rsplit("::").next().unwrap().to_string(),
        embeds: ordered(embeds.iter().map(|(f, t)| (*f, embed_field(f, t)))),
        ..Default::default()
    }
}

#[test]
fn test_duplicate_registration_rejected() {
    let registry = Registry::new();
    let first = registry.add_type(simple_type("demo::Button", &[])).unwrap();
    let err = registry.add_type(simple_type("demo::Button", &[]));
    assert!(matches!(err, Err(TypeRegError::DuplicateRegistration(name)) if name == "demo::Button"));

    // The first registration's identity is preserved.
    let looked_up = registry.type_by_name("demo::Button").unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &looked_up));
    assert_eq!(looked_up.id, first.id);
}

#[test]
fn test_ids_assigned_once_and_never_reused() {
    let registry = Registry::new();
    let a = registry.add_type(simple_type("demo::A", &[])).unwrap();
    let b = registry.add_type(simple_type("demo::B", &[])).unwrap();
    let f = registry
        .add_func(Func {
            name: "demo::alert".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert!(a.id > 0);
    assert_eq!(b.id, a.id + 1);
    assert_eq!(f.id, b.id + 1);
}

#[derive(Default)]
struct Sample {
    _value: u32,
}

#[derive(Default)]
struct Unregistered;

#[test]
fn test_type_by_value_resolves_runtime_identity() {
    let registry = Registry::new();
    let registered = registry
        .add_type(TypeInfo {
            name: "demo::Sample".to_string(),
            short_name: "Sample".to_string(),
            instance: Some(Box::new(Sample::default())),
            ..Default::default()
        })
        .unwrap();

    // Resolution goes through the value's concrete runtime identity, not a
    // name: the caller only has an instance in hand.
    let value = Sample::default();
    let found = registry.type_by_value(&value).unwrap();
    assert!(std::sync::Arc::ptr_eq(&registered, &found));

    assert!(registry.type_by_value(&Unregistered).is_none());
}

#[test]
fn test_has_embed_is_reflexive_without_closure() {
    let registry = Registry::new();
    let a = registry.add_type(simple_type("demo::A", &[])).unwrap();
    let b = registry.add_type(simple_type("demo::B", &[])).unwrap();

    assert!(registry.has_embed(&a, &a));
    assert!(!registry.has_embed(&a, &b));
    // A type with no declared embeds never populates the closure cache.
    assert!(a.all_embeds.get().is_none());
}

#[test]
fn test_has_embed_transitive_closure() {
    let registry = Registry::new();
    let c = registry.add_type(simple_type("demo::C", &[])).unwrap();
    let b = registry
        .add_type(simple_type("demo::B", &[("c", "demo::C")]))
        .unwrap();
    let a = registry
        .add_type(simple_type("demo::A", &[("b", "demo::B")]))
        .unwrap();
    let d = registry.add_type(simple_type("demo::D", &[])).unwrap();

    assert!(registry.has_embed(&a, &a));
    assert!(registry.has_embed(&a, &b));
    assert!(registry.has_embed(&a, &c));
    assert!(!registry.has_embed(&a, &d));
    assert!(!registry.has_embed(&c, &a));

    // The closure is cached after the first query.
    let closure = a.all_embeds.get().unwrap();
    assert_eq!(closure.len(), 2);
}

#[test]
fn test_has_embed_cycle_terminates() {
    let registry = Registry::new();
    let a = registry
        .add_type(simple_type("demo::A", &[("b", "demo::B")]))
        .unwrap();
    let b = registry
        .add_type(simple_type("demo::B", &[("a", "demo::A")]))
        .unwrap();

    assert!(registry.has_embed(&a, &b));
    assert!(registry.has_embed(&b, &a));
    assert!(registry.has_embed(&a, &a));
    assert!(registry.has_embed(&b, &b));
}

#[test]
fn test_unresolved_embed_does_not_abort_siblings() {
    let registry = Registry::new();
    let b = registry.add_type(simple_type("demo::B", &[])).unwrap();
    let a = registry
        .add_type(simple_type(
            "demo::A",
            &[("missing", "external::Missing"), ("b", "demo::B")],
        ))
        .unwrap();

    // The unregistered embed is silently excluded; the sibling resolves.
    assert!(registry.has_embed(&a, &b));
    assert_eq!(a.all_embeds.get().unwrap().len(), 1);
}

#[test]
fn test_registration_order_preserved() {
    let registry = Registry::new();
    registry.add_type(simple_type("demo::Z", &[])).unwrap();
    registry.add_type(simple_type("demo::A", &[])).unwrap();
    registry.add_type(simple_type("demo::M", &[])).unwrap();

    let names: Vec<String> = registry.types().iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["demo::Z", "demo::A", "demo::M"]);
}

#[test]
fn test_func_and_var_lookup() {
    let registry = Registry::new();
    registry
        .add_func(Func {
            name: "demo::alert".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert!(registry.func_by_name("demo::alert").is_some());
    assert!(registry.func_by_name("demo::missing").is_none());

    let err = registry.add_func(Func {
        name: "demo::alert".to_string(),
        ..Default::default()
    });
    assert!(matches!(err, Err(TypeRegError::DuplicateRegistration(_))));
}
