//! Accumulation of per-stream resource maps into a host resource collection.
//!
//! The [`Synthesizer`] is the explicit accumulator for one run: streams are
//! merged in declaration order, and the shared archival resources are
//! tracked so a [`SharedResourcePolicy`] can decide what happens when a later
//! stream redeclares one.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SharedResourcePolicy;
use crate::resources::is_shared;
use crate::template::merge::deep_merge;
use crate::template::render::render_resource;
use crate::template::ResourceMap;

/// Errors from merging stream resources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error(
        "stream '{stream}' redeclares shared resource '{resource}' differently than stream '{owner}'"
    )]
    SharedResourceConflict {
        resource: String,
        owner: String,
        stream: String,
    },
}

/// A shared declaration as merged so far and the stream that owns it.
#[derive(Debug, Clone)]
struct SharedDeclaration {
    owner: String,
    declaration: Value,
}

/// Merges stream resource maps into a collection under a shared-resource policy.
#[derive(Debug, Default)]
pub struct Synthesizer {
    policy: SharedResourcePolicy,
    shared: HashMap<String, SharedDeclaration>,
}

impl Synthesizer {
    pub fn new(policy: SharedResourcePolicy) -> Self {
        Self {
            policy,
            shared: HashMap::new(),
        }
    }

    /// Merge one stream's resources into `collection`.
    ///
    /// Returns the number of declarations merged. With
    /// [`SharedResourcePolicy::Reject`] a conflicting redeclaration fails
    /// before anything from this stream is merged.
    pub fn merge(
        &mut self,
        collection: &mut Map<String, Value>,
        stream: &str,
        resources: &ResourceMap,
    ) -> Result<usize, SynthesisError> {
        let mut accepted = Vec::with_capacity(resources.len());

        for (id, resource) in resources.iter() {
            let declaration = render_resource(resource);

            let Some(previous) = self.shared.get(id) else {
                accepted.push((id, declaration, stream.to_string()));
                continue;
            };

            let differs = previous.declaration != declaration;
            let (combined, owner) = match self.policy {
                SharedResourcePolicy::LastWins => {
                    if differs {
                        warn!(
                            resource = id,
                            owner = %previous.owner,
                            stream,
                            "shared archival resource redeclared, later stream wins"
                        );
                    }
                    let mut combined = previous.declaration.clone();
                    deep_merge(&mut combined, declaration);
                    (combined, stream.to_string())
                }
                SharedResourcePolicy::FirstWins => {
                    // Later streams may still add fields (e.g. the transform
                    // statement on the delivery role) but never change one.
                    let mut combined = declaration;
                    deep_merge(&mut combined, previous.declaration.clone());
                    if combined != previous.declaration {
                        debug!(resource = id, stream, "extending first shared declaration");
                    }
                    (combined, previous.owner.clone())
                }
                SharedResourcePolicy::Reject if differs => {
                    return Err(SynthesisError::SharedResourceConflict {
                        resource: id.to_string(),
                        owner: previous.owner.clone(),
                        stream: stream.to_string(),
                    });
                }
                SharedResourcePolicy::Reject => (declaration, previous.owner.clone()),
            };
            accepted.push((id, combined, owner));
        }

        let merged = accepted.len();
        for (id, declaration, owner) in accepted {
            if is_shared(id) {
                self.shared.insert(
                    id.to_string(),
                    SharedDeclaration {
                        owner,
                        declaration: declaration.clone(),
                    },
                );
            }
            merge_entry(collection, id, declaration);
        }

        debug!(stream, merged, policy = ?self.policy, "merged stream resources");
        Ok(merged)
    }
}

/// Deep-merge one declaration into the collection under `id`.
fn merge_entry(collection: &mut Map<String, Value>, id: &str, declaration: Value) {
    match collection.get_mut(id) {
        Some(existing) => deep_merge(existing, declaration),
        None => {
            collection.insert(id.to_string(), declaration);
        }
    }
}
