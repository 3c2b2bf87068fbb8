//! Newline transform: an inline record processor and its execution role.
//!
//! The processor receives delivery batches, appends `\n` to every record's
//! decoded payload and returns the re-encoded records with result `Ok`. The
//! same contract is implemented natively in [`crate::record_processor`].

use crate::template::{Expr, Resource};

use super::archive::{allow, policy_document, service_trust, ROLE_TYPE};
use super::TRANSFORM_ROLE_ID;

pub const FUNCTION_TYPE: &str = "AWS::Lambda::Function";
pub const RUNTIME: &str = "python3.12";
pub const HANDLER: &str = "index.handler";
/// Invocation timeout in seconds.
pub const TIMEOUT_SECONDS: u32 = 60;
pub const MEMORY_MB: u32 = 128;
pub const EXECUTION_SERVICE: &str = "lambda.amazonaws.com";
pub const EXECUTION_POLICY_NAME: &str = "KinesisStreamsNewlineTransformLogs";

pub const LOG_ACTIONS: [&str; 3] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
];

/// Inline source of the record processor.
pub const SOURCE: &str = r#"import base64


def handler(event, context):
    return {
        'records': [
            {
                'recordId': record['recordId'],
                'result': 'Ok',
                'data': base64.b64encode(base64.b64decode(record['data']) + b'\n').decode('ascii'),
            }
            for record in event['records']
        ]
    }
"#;

/// Execution role of the transform function.
pub fn execution_role() -> Resource {
    let policy = Expr::map([
        ("PolicyName", Expr::from(EXECUTION_POLICY_NAME)),
        (
            "PolicyDocument",
            policy_document(vec![Expr::map(allow(
                &LOG_ACTIONS,
                Expr::interpolate("arn:${AWS::Partition}:logs:${AWS::Region}:${AWS::AccountId}:*"),
            ))]),
        ),
    ]);

    Resource::new(ROLE_TYPE)
        .with("AssumeRolePolicyDocument", service_trust(EXECUTION_SERVICE, None))
        .with("Policies", Expr::List(vec![policy]))
}

/// The transform function with its source inlined.
pub fn function() -> Resource {
    Resource::new(FUNCTION_TYPE)
        .with("Runtime", RUNTIME)
        .with("Handler", HANDLER)
        .with("Timeout", TIMEOUT_SECONDS)
        .with("MemorySize", MEMORY_MB)
        .with("Role", Expr::arn(TRANSFORM_ROLE_ID))
        .with("Code", Expr::map([("ZipFile", Expr::from(SOURCE))]))
}
