/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::backend::SharedBackend;

/// Types for single object copy operation
pub mod copy;

/// Container for maintaining context required to carry out a single operation.
///
/// `State` is whatever additional operation specific state is required for the operation.
#[derive(Debug)]
pub(crate) struct TransferContext<State> {
    pub(crate) handle: Arc<crate::client::Handle>,
    state: Arc<State>,
}

impl<State> TransferContext<State> {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, state: State) -> Self {
        Self {
            handle,
            state: Arc::new(state),
        }
    }

    /// The default backend of the client
    pub(crate) fn backend(&self) -> &SharedBackend {
        self.handle.config.backend()
    }

    /// Operation specific state
    pub(crate) fn state(&self) -> &State {
        &self.state
    }
}

impl<State> Clone for TransferContext<State> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: self.state.clone(),
        }
    }
}
