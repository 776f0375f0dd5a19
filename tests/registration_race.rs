//! Concurrent first-run initialization across generic instantiations: no
//! registration may be lost, and each instantiation registers exactly once.

use std::sync::Arc;
use std::thread;

use cilreset::prelude::*;

/// A two-parameter generic type with one inventoried field, an initializer
/// and a pre-reset callback, giving every instantiation one registration on
/// each channel.
fn cache_module() -> (Module, Token) {
    let ty_token = Token::type_def(1);
    let mut cache = TypeDefinition::new(ty_token, "Game", "Cache");
    cache.generic_params.push(GenericParam::new("K", 0));
    cache.generic_params.push(GenericParam::new("V", 1));
    cache
        .fields
        .push(Field::new_static(Token::field(1), "generation", StorageType::I4));
    cache.methods.push(Method::new_initializer(
        Token::method(1),
        BodyBuilder::new()
            .ldc_i4(1)
            .stsfld(FieldRef::new(ty_token, Token::field(1)))
            .ret()
            .build(),
    ));
    cache.methods.push(
        Method::new_static(
            Token::method(2),
            "Flush",
            BodyBuilder::new()
                .ldc_i4(-1)
                .stsfld(FieldRef::new(ty_token, Token::field(1)))
                .ret()
                .build(),
        )
        .with_marker(Marker::new(MarkerKind::ResetOnUnload)),
    );

    let mut module = Module::new("Game.Core");
    module.add_type(cache).unwrap();
    (module, ty_token)
}

fn instrumented_image() -> (Arc<RuntimeImage>, Token) {
    let (mut module, ty_token) = cache_module();
    ResetTransformer::new(Arc::new(Diagnostics::new()))
        .transform(&mut module)
        .unwrap();
    (RuntimeImage::load(module), ty_token)
}

fn all_instantiations(ty_token: Token) -> Vec<TypeInstance> {
    let storage = [
        StorageType::Bool,
        StorageType::I4,
        StorageType::I8,
        StorageType::String,
    ];
    let mut instances = Vec::new();
    for key in storage {
        for value in storage {
            instances.push(TypeInstance::new(ty_token, vec![key, value]));
        }
    }
    instances
}

#[test]
fn test_concurrent_instantiations_all_register() {
    let (image, ty_token) = instrumented_image();
    let instances = all_instantiations(ty_token);
    let expected = instances.len();

    let mut handles = Vec::new();
    for instance in instances.clone() {
        let image = Arc::clone(&image);
        handles.push(thread::spawn(move || image.ensure_initialized(instance)));
    }
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(image.registry().len(Channel::Unload), expected);
    assert_eq!(image.registry().len(Channel::Load), expected);

    // Every instantiation was initialized with its own storage.
    for instance in &instances {
        assert_eq!(
            image.static_value(instance, "generation"),
            Some(Value::I4(1))
        );
    }

    // Draining the unload channel reaches each instantiation exactly once:
    // each callback stamps its own instantiation's storage.
    image.registry().invoke(Channel::Unload).unwrap();
    for instance in &instances {
        assert_eq!(
            image.static_value(instance, "generation"),
            Some(Value::I4(-1))
        );
    }
}

#[test]
fn test_racing_threads_on_one_instantiation_register_once() {
    let (image, ty_token) = instrumented_image();
    let instance = TypeInstance::new(ty_token, vec![StorageType::I4, StorageType::String]);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let image = Arc::clone(&image);
        let instance = instance.clone();
        handles.push(thread::spawn(move || image.ensure_initialized(instance)));
    }
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(image.registry().len(Channel::Unload), 1);
    assert_eq!(image.registry().len(Channel::Load), 1);
}

#[test]
fn test_mismatched_argument_count_is_rejected() {
    let (image, ty_token) = instrumented_image();
    let result = image.ensure_initialized(TypeInstance::new(ty_token, vec![StorageType::I4]));
    assert!(matches!(result, Err(Error::GenericContext { .. })));
    assert!(image.registry().is_empty());
}
