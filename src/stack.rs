// Copyright 2024 The Jsonic Authors
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

use crate::constants::STACK_ROUND;
use crate::error::Error;
use crate::error::Position;
use crate::error::Result;
use crate::error::StructureErrorCode;
use crate::value::Object;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Array,
    Object,
}

/// One in-progress container. Object frames track the key waiting for its
/// value; the position the container was opened at is kept for diagnostics.
#[derive(Debug)]
enum Frame<'a> {
    Array {
        open: Position,
        items: Vec<Value<'a>>,
    },
    Object {
        open: Position,
        entries: Object<'a>,
        pending_key: Option<String>,
    },
}

/// The explicit stack of in-progress containers.
///
/// Replaces native call-stack recursion so that nesting depth is bounded by
/// configuration rather than by the host stack: pathological input fails
/// with a structure error instead of exhausting memory. Frame storage grows
/// in rounded steps like the managed buffers do.
#[derive(Debug)]
pub(crate) struct ObjectStack<'a> {
    frames: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> ObjectStack<'a> {
    pub(crate) fn new(max_depth: usize) -> ObjectStack<'a> {
        ObjectStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn top_kind(&self) -> Option<ContainerKind> {
        self.frames.last().map(|frame| match frame {
            Frame::Array { .. } => ContainerKind::Array,
            Frame::Object { .. } => ContainerKind::Object,
        })
    }

    /// True when the innermost frame is an array with no elements yet, the
    /// only position where a `]` is legal while a value is expected.
    pub(crate) fn top_is_empty_array(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Array { items, .. }) if items.is_empty())
    }

    /// True when the innermost frame is an object with no entries yet, the
    /// only position where a `}` is legal while a key is expected. Rules
    /// out trailing commas like `{"a":1,}`.
    pub(crate) fn top_is_empty_object(&self) -> bool {
        matches!(
            self.frames.last(),
            Some(Frame::Object {
                entries,
                pending_key: None,
                ..
            }) if entries.is_empty()
        )
    }

    /// Where the innermost open container started, for two-point
    /// diagnostics.
    pub(crate) fn top_open_pos(&self) -> Option<Position> {
        self.frames.last().map(|frame| match frame {
            Frame::Array { open, .. } | Frame::Object { open, .. } => *open,
        })
    }

    fn reserve_for_push(&mut self) -> Result<()> {
        if self.frames.len() == self.frames.capacity() {
            let target = (self.frames.len() + STACK_ROUND) / STACK_ROUND * STACK_ROUND;
            self.frames
                .try_reserve_exact(target - self.frames.len())
                .map_err(|_| Error::Resource)?;
        }
        Ok(())
    }

    /// Opens a new container frame. Fails once the configured nesting depth
    /// is exceeded.
    pub(crate) fn push_container(&mut self, kind: ContainerKind, open: Position) -> Result<()> {
        if self.frames.len() >= self.max_depth {
            return Err(Error::Structure(
                StructureErrorCode::DepthLimitExceeded,
                open,
                self.top_open_pos(),
            ));
        }
        self.reserve_for_push()?;
        self.frames.push(match kind {
            ContainerKind::Array => Frame::Array {
                open,
                items: Vec::new(),
            },
            ContainerKind::Object => Frame::Object {
                open,
                entries: Object::new(),
                pending_key: None,
            },
        });
        Ok(())
    }

    /// Records the key the next value belongs to. Only valid on an object
    /// frame with no key already pending.
    pub(crate) fn set_pending_key(&mut self, key: String, at: Position) -> Result<()> {
        let open = self.top_open_pos();
        match self.frames.last_mut() {
            Some(Frame::Object {
                pending_key: pending_key @ None,
                ..
            }) => {
                *pending_key = Some(key);
                Ok(())
            }
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedSomeValue,
                at,
                open,
            )),
        }
    }

    /// Appends `value` as the next array element, or as the value of the
    /// pending key in an object frame.
    pub(crate) fn push_value(&mut self, value: Value<'a>, at: Position) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Array { items, .. }) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Object {
                open,
                entries,
                pending_key,
            }) => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, value);
                    Ok(())
                }
                None => Err(Error::Structure(
                    StructureErrorCode::ExpectedObjectKey,
                    at,
                    Some(*open),
                )),
            },
            None => Err(Error::Structure(
                StructureErrorCode::ExpectedSomeValue,
                at,
                None,
            )),
        }
    }

    /// Closes the top frame. The completed container is folded into its
    /// parent, or returned when the stack becomes empty (the decoded root).
    pub(crate) fn pop_container(&mut self, at: Position) -> Result<Option<Value<'a>>> {
        let value = match self.frames.pop() {
            Some(Frame::Array { items, .. }) => Value::Array(items),
            Some(Frame::Object {
                open,
                entries,
                pending_key,
            }) => {
                if pending_key.is_some() {
                    return Err(Error::Structure(
                        StructureErrorCode::ObjectKeyWithoutValue,
                        at,
                        Some(open),
                    ));
                }
                Value::Object(entries)
            }
            None => {
                return Err(Error::Structure(
                    StructureErrorCode::ExpectedSomeValue,
                    at,
                    None,
                ))
            }
        };
        if self.frames.is_empty() {
            Ok(Some(value))
        } else {
            self.push_value(value, at)?;
            Ok(None)
        }
    }
}
