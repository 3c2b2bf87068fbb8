//! Stream compilation step definitions.

use cucumber::{gherkin::Step, given, then, when, World};
use kinesis_streams::config::{SharedResourcePolicy, COMPILE_EVENT};
use kinesis_streams::host::{Lifecycle, ServiceContext};
use kinesis_streams::interfaces::HookError;
use kinesis_streams::KinesisStreamsPlugin;
use serde_json::Value;

/// Test context for stream compilation scenarios.
#[derive(Debug, Default, World)]
pub struct SynthesisWorld {
    document: String,
    policy: Option<SharedResourcePolicy>,
    before: Option<ServiceContext>,
    context: Option<ServiceContext>,
    result: Option<Result<usize, HookError>>,
}

impl SynthesisWorld {
    fn context(&self) -> &ServiceContext {
        self.context.as_ref().expect("Service not packaged")
    }

    fn resource(&self, id: &str) -> &Value {
        self.context()
            .resources()
            .get(id)
            .unwrap_or_else(|| panic!("Resource {id} not in template"))
    }

    fn property(&self, id: &str, path: &str) -> Option<&Value> {
        let pointer = format!("/Properties/{}", path.replace('.', "/"));
        self.resource(id).pointer(&pointer)
    }
}

// ==========================================================================
// Given Steps
// ==========================================================================

#[given("a service document:")]
async fn given_service_document(world: &mut SynthesisWorld, step: &Step) {
    world.document = step.docstring.clone().expect("Step needs a docstring");
}

#[given(expr = "the shared resource policy is overridden to {string}")]
async fn given_policy_override(world: &mut SynthesisWorld, policy: String) {
    let policy = serde_json::from_value(Value::String(policy)).expect("Unknown policy");
    world.policy = Some(policy);
}

// ==========================================================================
// When Steps
// ==========================================================================

#[when("the service is packaged")]
async fn when_packaged(world: &mut SynthesisWorld) {
    let mut ctx = ServiceContext::from_yaml_str(&world.document).expect("Invalid service document");
    world.before = Some(ctx.clone());

    let mut plugin = KinesisStreamsPlugin::new();
    if let Some(policy) = world.policy {
        plugin = plugin.with_shared_resource_policy(policy);
    }

    let mut lifecycle = Lifecycle::new();
    lifecycle.register(plugin);
    world.result = Some(lifecycle.run(COMPILE_EVENT, &mut ctx));
    world.context = Some(ctx);
}

// ==========================================================================
// Then Steps
// ==========================================================================

#[then("packaging succeeds")]
async fn then_succeeds(world: &mut SynthesisWorld) {
    let result = world.result.as_ref().expect("Service not packaged");
    assert!(result.is_ok(), "Packaging failed: {:?}", result);
}

#[then(expr = "packaging fails mentioning {string}")]
async fn then_fails(world: &mut SynthesisWorld, fragment: String) {
    match world.result.as_ref().expect("Service not packaged") {
        Ok(_) => panic!("Expected packaging to fail"),
        Err(e) => assert!(
            e.to_string().contains(&fragment),
            "Error '{e}' does not mention '{fragment}'"
        ),
    }
}

#[then("the template is unchanged")]
async fn then_unchanged(world: &mut SynthesisWorld) {
    assert_eq!(world.context.as_ref(), world.before.as_ref());
}

#[then("the template resources are, in order:")]
async fn then_resources_in_order(world: &mut SynthesisWorld, step: &Step) {
    let table = step.table.as_ref().expect("Step needs a table");
    let expected: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
    let actual: Vec<&str> = world.context().resources().keys().map(String::as_str).collect();
    assert_eq!(actual, expected);
}

#[then(expr = "resource {string} has type {string}")]
async fn then_resource_type(world: &mut SynthesisWorld, id: String, resource_type: String) {
    assert_eq!(world.resource(&id)["Type"], Value::String(resource_type));
}

#[then(expr = "resource {string} has property {string} equal to {string}")]
async fn then_property_equals(world: &mut SynthesisWorld, id: String, path: String, expected: String) {
    let expected: Value = serde_json::from_str(&expected).expect("Expected value must be JSON");
    assert_eq!(world.property(&id, &path), Some(&expected), "{id}.{path}");
}

#[then(expr = "resource {string} has no property {string}")]
async fn then_property_absent(world: &mut SynthesisWorld, id: String, path: String) {
    assert!(world.property(&id, &path).is_none(), "{id}.{path} is present");
}

#[then(expr = "the template has no resource {string}")]
async fn then_resource_absent(world: &mut SynthesisWorld, id: String) {
    assert!(!world.context().resources().contains_key(&id));
}

#[then(expr = "the delivery role grants {string}")]
async fn then_role_grants(world: &mut SynthesisWorld, action: String) {
    assert!(delivery_actions(world).contains(&action), "{action} not granted");
}

#[then(expr = "the delivery role does not grant {string}")]
async fn then_role_does_not_grant(world: &mut SynthesisWorld, action: String) {
    assert!(!delivery_actions(world).contains(&action), "{action} granted");
}

fn delivery_actions(world: &SynthesisWorld) -> Vec<String> {
    let statements = world
        .property("KinesisStreamsDeliveryRole", "Policies.0.PolicyDocument.Statement")
        .and_then(Value::as_array)
        .expect("Delivery role has no statements");

    statements
        .iter()
        .filter_map(|s| s["Action"].as_array())
        .flatten()
        .filter_map(|a| a.as_str().map(str::to_string))
        .collect()
}
