//! The disassembly result: methods keyed by identifier.

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::{
    disassembler::{CollisionPolicy, Instruction, MethodId},
    Error, Result,
};

/// A top-level, identifier-addressed block of code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    /// The method identifier, either the entry sentinel or a dictionary key
    pub id: MethodId,
    /// The method body in decode order
    #[serde(rename = "instList")]
    pub instructions: Vec<Instruction>,
    #[serde(skip)]
    generation: u64,
}

impl Method {
    /// Number of instructions in the body, nested blocks included.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions
            .iter()
            .map(Instruction::instruction_count)
            .sum()
    }
}

/// A disassembled program.
///
/// Holds exactly one [`Method`] per distinct identifier that was targeted during
/// disassembly. Anonymous blocks are not registered here; they live inside the operand of
/// the instruction that spawned them.
///
/// Serializes as `{"methods": {"<id>": {"id": .., "instList": [..]}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    methods: BTreeMap<MethodId, Method>,
    #[serde(skip)]
    next_generation: u64,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new() -> Self {
        Program::default()
    }

    /// Returns the method registered under `id`.
    #[must_use]
    pub fn method(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(&id)
    }

    /// Iterates over all methods in ascending identifier order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> + '_ {
        self.methods.values()
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Total number of instructions across all methods, nested blocks included.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.methods().map(Method::instruction_count).sum()
    }

    /// Serializes the program into compact JSON.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the program into indented JSON.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Registers an empty method under `id` and returns the ticket needed to fill it.
    ///
    /// An existing method under the same identifier is replaced right away, so a
    /// redefinition registered while this method's body is still being disassembled
    /// takes precedence over it.
    pub(crate) fn reserve(&mut self, id: MethodId, policy: CollisionPolicy) -> Result<u64> {
        if self.methods.contains_key(&id) {
            match policy {
                CollisionPolicy::Reject => return Err(Error::DuplicateMethod(id)),
                CollisionPolicy::Overwrite => {
                    warn!("Method {} is defined more than once, keeping the latest definition", id);
                }
            }
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.methods.insert(
            id,
            Method {
                id,
                instructions: Vec::new(),
                generation,
            },
        );
        Ok(generation)
    }

    /// Stores the body of a method reserved with `generation`.
    ///
    /// The body is dropped if the method was replaced in the meantime.
    pub(crate) fn fill(&mut self, id: MethodId, generation: u64, instructions: Vec<Instruction>) {
        match self.methods.get_mut(&id) {
            Some(method) if method.generation == generation => method.instructions = instructions,
            _ => {}
        }
    }
}
