//! Archival sub-pipeline: bucket, delivery role, log group and delivery stream.

use crate::config::ResolvedStreamConfig;
use crate::template::{Expr, Pseudo, Resource};

use super::{
    stream_id, ARCHIVE_BUCKET_ID, DELIVERY_LOG_GROUP_ID, DELIVERY_ROLE_ID, TRANSFORM_FUNCTION_ID,
};

pub const BUCKET_TYPE: &str = "AWS::S3::Bucket";
pub const ROLE_TYPE: &str = "AWS::IAM::Role";
pub const LOG_GROUP_TYPE: &str = "AWS::Logs::LogGroup";
pub const DELIVERY_STREAM_TYPE: &str = "AWS::KinesisFirehose::DeliveryStream";

pub const IAM_POLICY_VERSION: &str = "2012-10-17";
pub const DELIVERY_POLICY_NAME: &str = "KinesisStreamsDelivery";
pub const DELIVERY_SERVICE: &str = "firehose.amazonaws.com";

pub const LOG_RETENTION_DAYS: u32 = 30;
pub const BUFFER_INTERVAL_SECONDS: u32 = 60;
pub const BUFFER_SIZE_MB: u32 = 1;
pub const COMPRESSION_FORMAT: &str = "GZIP";
/// Retries for the record processor invocation.
pub const PROCESSOR_RETRIES: &str = "3";

pub const BUCKET_ACTIONS: [&str; 6] = [
    "s3:AbortMultipartUpload",
    "s3:GetBucketLocation",
    "s3:GetObject",
    "s3:ListBucket",
    "s3:ListBucketMultipartUploads",
    "s3:PutObject",
];
pub const STREAM_READ_ACTIONS: [&str; 3] = [
    "kinesis:DescribeStream",
    "kinesis:GetShardIterator",
    "kinesis:GetRecords",
];
pub const KMS_ACTIONS: [&str; 2] = ["kms:Decrypt", "kms:GenerateDataKey"];
pub const TRANSFORM_ACTIONS: [&str; 2] = ["lambda:InvokeFunction", "lambda:GetFunctionConfiguration"];

/// `{ "Version": ..., "Statement": [...] }`
pub(crate) fn policy_document(statements: Vec<Expr>) -> Expr {
    Expr::map([
        ("Version", Expr::from(IAM_POLICY_VERSION)),
        ("Statement", Expr::List(statements)),
    ])
}

/// An `Allow` statement for `actions` on `resource`.
pub(crate) fn allow(actions: &[&str], resource: Expr) -> Vec<(&'static str, Expr)> {
    vec![
        ("Effect", Expr::from("Allow")),
        ("Action", Expr::strings(actions.iter().copied())),
        ("Resource", resource),
    ]
}

/// Trust policy letting `service` assume the role.
pub(crate) fn service_trust(service: &str, condition: Option<Expr>) -> Expr {
    let mut statement = vec![
        ("Effect", Expr::from("Allow")),
        (
            "Principal",
            Expr::map([("Service", Expr::strings([service]))]),
        ),
        ("Action", Expr::strings(["sts:AssumeRole"])),
    ];
    if let Some(condition) = condition {
        statement.push(("Condition", condition));
    }
    policy_document(vec![Expr::map(statement)])
}

fn bucket_objects() -> Expr {
    Expr::concat([Expr::arn(ARCHIVE_BUCKET_ID), "/*".into()])
}

/// Archive bucket with default KMS encryption.
pub fn bucket(config: &ResolvedStreamConfig) -> Resource {
    let encryption = Expr::map([(
        "ServerSideEncryptionConfiguration",
        Expr::List(vec![Expr::map([(
            "ServerSideEncryptionByDefault",
            Expr::map([("SSEAlgorithm", Expr::from("aws:kms"))]),
        )])]),
    )]);

    Resource::new(BUCKET_TYPE)
        .with_opt("BucketName", config.archive_bucket.as_deref())
        .with("BucketEncryption", encryption)
}

/// Role assumed by the delivery service for reading the stream and writing
/// to the bucket.
pub fn delivery_role(config: &ResolvedStreamConfig) -> Resource {
    let external_id = Expr::map([(
        "StringEquals",
        Expr::map([("sts:ExternalId", Expr::Pseudo(Pseudo::AccountId))]),
    )]);

    let mut statements = vec![
        Expr::map(allow(
            &BUCKET_ACTIONS,
            Expr::List(vec![Expr::arn(ARCHIVE_BUCKET_ID), bucket_objects()]),
        )),
        Expr::map(allow(
            &STREAM_READ_ACTIONS,
            Expr::interpolate(
                "arn:${AWS::Partition}:kinesis:${AWS::Region}:${AWS::AccountId}:stream/*",
            ),
        )),
        Expr::map(kms_statement()),
    ];

    if config.archive_transform_newlines {
        statements.push(Expr::map(allow(
            &TRANSFORM_ACTIONS,
            Expr::List(vec![
                Expr::arn(TRANSFORM_FUNCTION_ID),
                Expr::concat([Expr::arn(TRANSFORM_FUNCTION_ID), ":*".into()]),
            ]),
        )));
    }

    let policy = Expr::map([
        ("PolicyName", Expr::from(DELIVERY_POLICY_NAME)),
        ("PolicyDocument", policy_document(statements)),
    ]);

    Resource::new(ROLE_TYPE)
        .with(
            "AssumeRolePolicyDocument",
            service_trust(DELIVERY_SERVICE, Some(external_id)),
        )
        .with("Policies", Expr::List(vec![policy]))
}

/// Key usage is only allowed through S3, for objects of the archive bucket.
fn kms_statement() -> Vec<(&'static str, Expr)> {
    let mut statement = allow(
        &KMS_ACTIONS,
        Expr::interpolate("arn:${AWS::Partition}:kms:${AWS::Region}:${AWS::AccountId}:key/*"),
    );
    statement.push((
        "Condition",
        Expr::map([
            (
                "StringEquals",
                Expr::map([(
                    "kms:ViaService",
                    Expr::interpolate("s3.${AWS::Region}.amazonaws.com"),
                )]),
            ),
            (
                "StringLike",
                Expr::map([("kms:EncryptionContext:aws:s3:arn", bucket_objects())]),
            ),
        ]),
    ));
    statement
}

/// Log group for delivery errors.
pub fn log_group() -> Resource {
    Resource::new(LOG_GROUP_TYPE).with("RetentionInDays", LOG_RETENTION_DAYS)
}

/// Delivery stream draining the stream into the archive bucket.
pub fn delivery_stream(config: &ResolvedStreamConfig) -> Resource {
    let role_arn = Expr::arn(DELIVERY_ROLE_ID);

    let source = Expr::map([
        ("KinesisStreamARN", Expr::arn(stream_id(&config.clean_name))),
        ("RoleARN", role_arn.clone()),
    ]);

    let mut destination = vec![
        ("BucketARN", Expr::arn(ARCHIVE_BUCKET_ID)),
        (
            "BufferingHints",
            Expr::map([
                ("IntervalInSeconds", Expr::from(BUFFER_INTERVAL_SECONDS)),
                ("SizeInMBs", Expr::from(BUFFER_SIZE_MB)),
            ]),
        ),
        ("CompressionFormat", Expr::from(COMPRESSION_FORMAT)),
        ("Prefix", Expr::from(format!("{}/", config.name))),
        ("RoleARN", role_arn.clone()),
        (
            "CloudWatchLoggingOptions",
            Expr::map([
                ("Enabled", Expr::from(true)),
                ("LogGroupName", Expr::reference(DELIVERY_LOG_GROUP_ID)),
                ("LogStreamName", Expr::from(config.clean_name.as_str())),
            ]),
        ),
    ];

    if config.archive_transform_newlines {
        destination.push(("ProcessingConfiguration", processing(role_arn)));
    }

    Resource::new(DELIVERY_STREAM_TYPE)
        .with("DeliveryStreamType", "KinesisStreamAsSource")
        .with("KinesisStreamSourceConfiguration", source)
        .with("ExtendedS3DestinationConfiguration", Expr::map(destination))
}

fn processing(role_arn: Expr) -> Expr {
    let parameter = |name: &str, value: Expr| {
        Expr::map([
            ("ParameterName", Expr::from(name)),
            ("ParameterValue", value),
        ])
    };

    Expr::map([
        ("Enabled", Expr::from(true)),
        (
            "Processors",
            Expr::List(vec![Expr::map([
                ("Type", Expr::from("Lambda")),
                (
                    "Parameters",
                    Expr::List(vec![
                        parameter("LambdaArn", Expr::arn(TRANSFORM_FUNCTION_ID)),
                        parameter("NumberOfRetries", Expr::from(PROCESSOR_RETRIES)),
                        parameter("RoleArn", role_arn),
                    ]),
                ),
            ])]),
        ),
    ])
}
