/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::locator::ObjectLocator;
use crate::operation::copy::PassthroughFields;
use crate::operation::TransferContext;

/// Resolved, immutable description of a single copy
#[derive(Debug)]
pub(crate) struct CopyState {
    pub(crate) source: ObjectLocator,
    pub(crate) destination: ObjectLocator,
    pub(crate) passthrough: PassthroughFields,
}

/// Internal context used to drive a single Copy operation
pub(crate) type CopyContext = TransferContext<CopyState>;
