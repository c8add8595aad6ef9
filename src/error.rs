// Copyright 2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::ir::{BlockId, SsaId};

macro_rules! inconsistent_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Inconsistent {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Inconsistent {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

pub(crate) use inconsistent_error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant describes a violated internal-consistency invariant of the SSA
/// representation handed to the pass. There is no recoverable category: a procedure
/// that triggers one of these errors is malformed and must not be transformed further.
/// Skippable situations (an identifier that is simply not live at a copy point) are
/// expressed through return values, never through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// A [`crate::ir::BlockId`] referenced a block the procedure does not contain.
    #[error("Block {0} is not part of the procedure")]
    BlockNotFound(BlockId),

    /// A statement index was outside the valid range for its block.
    ///
    /// Raised on out-of-range insertion or lookup. Insertion accepts indices up to
    /// and including the block length; lookup only below it.
    #[error("Statement index {index} out of range for block {block} with {len} statements")]
    StatementIndexOutOfRange {
        /// The block that was addressed
        block: BlockId,
        /// The offending statement index
        index: usize,
        /// The number of statements in the block
        len: usize,
    },

    /// An [`crate::ir::SsaId`] is not registered in the identifier table.
    #[error("Identifier {0} is not registered in the identifier table")]
    IdentifierNotFound(SsaId),

    /// A rename was requested between identifiers whose definitions have no provable
    /// dominance relation.
    ///
    /// The replacement identifier must be defined by a statement, and the definition
    /// of the identifier being replaced must dominate that statement.
    #[error("No dominance relation between definitions of {old} and {new}")]
    NoDominanceRelation {
        /// The identifier whose uses were to be rewritten
        old: SsaId,
        /// The identifier that was to replace it
        new: SsaId,
    },

    /// The SSA representation violates one of its structural invariants.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the violated invariant
    /// * `file` - Source file where the violation was detected
    /// * `line` - Source line where the violation was detected
    #[error("Inconsistent SSA - {file}:{line}: {message}")]
    Inconsistent {
        /// The message to be printed for the Inconsistent error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
