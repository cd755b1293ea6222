/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::str::FromStr;
use std::time;

use aws_s3_copy_manager::locator::ObjectDescriptor;
use aws_s3_copy_manager::types::{ConcurrencySetting, PartSize};
use aws_sdk_s3::error::DisplayErrorContext;
use clap::{CommandFactory, Parser};
use tracing::{debug_span, Instrument};

type BoxError = Box<dyn Error + Send + Sync>;

const ONE_MEGABYTE: u64 = 1000 * 1000;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "cp")]
#[command(about = "Copies an S3 object to another location in S3 without downloading it.")]
pub struct Args {
    /// Source to copy from <S3Uri>
    #[arg(required = true)]
    source: S3Uri,

    /// Destination to copy to <S3Uri>
    #[arg(required = true)]
    dest: S3Uri,

    /// Number of concurrent part copies to perform.
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Part size to use
    #[arg(long, default_value_t = 52428800)]
    part_size: u64,

    /// Copy with a multipart upload instead of a single CopyObject request
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    multipart: bool,

    /// Region of the source bucket, when it differs from the destination's
    #[arg(long)]
    source_region: Option<String>,

    /// Size of the source object in bytes, skips querying it
    #[arg(long)]
    content_length: Option<u64>,
}

#[derive(Clone, Debug)]
struct S3Uri(String);

impl S3Uri {
    /// Split the URI into it's component parts '(bucket, key)'
    fn parts(&self) -> (&str, &str) {
        let bucket = self.0.strip_prefix("s3://").unwrap_or(&self.0);
        bucket.split_once('/').unwrap_or((bucket, ""))
    }
}

impl FromStr for S3Uri {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("s3://") {
            return Err(format!("expected an s3:// uri, got `{s}`").into());
        }
        Ok(S3Uri(s.to_owned()))
    }
}

fn invalid_arg(message: &str) -> ! {
    Args::command()
        .error(clap::error::ErrorKind::InvalidValue, message)
        .exit()
}

async fn do_copy(args: Args) -> Result<(), BoxError> {
    let (src_bucket, src_key) = args.source.parts();
    let (dest_bucket, dest_key) = args.dest.parts();
    if src_key.is_empty() || dest_key.is_empty() {
        invalid_arg("source and destination must name an object");
    }

    let config = aws_config::from_env().load().await;
    let s3_client = aws_sdk_s3::Client::new(&config);

    let cm_config = aws_s3_copy_manager::Config::builder()
        .concurrency(ConcurrencySetting::Explicit(args.concurrency))
        .part_size(PartSize::Target(args.part_size))
        .client(s3_client)
        .build()?;

    let cm = aws_s3_copy_manager::Client::new(cm_config);
    // descriptor source so the size query honors `--source-region`
    let source = ObjectDescriptor::builder()
        .bucket(src_bucket)
        .key(src_key)
        .build();

    println!("starting copy");
    let start = time::Instant::now();

    let mut copy = cm
        .object(dest_bucket, dest_key)
        .copy_from(source)
        .multipart_copy(args.multipart)
        .set_copy_source_region(args.source_region.clone())
        .set_content_length(args.content_length);
    if args.multipart {
        copy = copy.part_size(args.part_size);
    }
    let output = copy.send().instrument(debug_span!("copy-object")).await?;
    tracing::info!("copy output: {output:?}");

    let elapsed = start.elapsed();
    match (output.parts_copied(), args.content_length) {
        (Some(parts), Some(obj_size_bytes)) => {
            let obj_size_megabytes = obj_size_bytes as f64 / ONE_MEGABYTE as f64;
            let obj_size_megabits = obj_size_megabytes * 8f64;
            println!(
                "copied {obj_size_bytes} bytes ({obj_size_megabytes} MB) as {parts} parts in {elapsed:?}; Mb/s: {}",
                obj_size_megabits / elapsed.as_secs_f64(),
            );
        }
        (Some(parts), None) => println!("copied {parts} parts in {elapsed:?}"),
        (None, _) => println!("copied object in {elapsed:?}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = dbg!(Args::parse());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let result = do_copy(args).await;

    if let Err(ref err) = result {
        tracing::error!("copy failed: {}", DisplayErrorContext(err.as_ref()));
    }

    Ok(())
}
