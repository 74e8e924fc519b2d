//! Variable catalog
//!
//! Maps qualified variable names and short identifiers to registered
//! variables and their bound [`Codec`]. The writer builds it one
//! registration at a time; the reader fills it while parsing `$var`
//! records.
//!
//! A trace may declare several names for one identifier (aliases), so the
//! identifier index points at a list of entries while each name maps to
//! exactly one.

pub mod id;

pub use id::{IdAllocator, IdCode};

use std::collections::{HashMap, HashSet};

use crate::codec::Codec;
use crate::error::{Result, VcdError};
use crate::types::{qualify, VarType, Variable, VariableDecl};

/// A catalog entry: the variable and the codec bound to it
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub variable: Variable,
    pub codec: Codec,
}

/// A declaration that passed validation, ready to be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDecl {
    pub name: String,
    pub var_type: VarType,
    pub width: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<IdCode, Vec<usize>>,
    ids: IdAllocator,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a batch of declarations under one scope without modifying the catalog
    pub fn validate(&self, scope: &str, decls: &[VariableDecl]) -> Result<Vec<ValidatedDecl>> {
        if !scope.is_empty() {
            for segment in scope.split('.') {
                check_name(segment, scope)?;
            }
        }
        let mut batch_names = HashSet::new();
        decls
            .iter()
            .map(|decl| {
                let var_type: VarType = decl.type_name.parse()?;
                let name = qualify(scope, &decl.name);
                check_name(&decl.name, &name)?;
                if var_type.is_bit_vector() && decl.width == 0 {
                    return Err(VcdError::InvalidWidth {
                        name,
                        width: decl.width,
                    });
                }
                if self.by_name.contains_key(&name) || !batch_names.insert(name.clone()) {
                    return Err(VcdError::DuplicateVariable(name));
                }
                Ok(ValidatedDecl {
                    name,
                    var_type,
                    width: decl.width,
                })
            })
            .collect()
    }

    /// Allocate the next identifier and bind a codec to a validated declaration
    pub fn bind(&mut self, decl: ValidatedDecl) -> &Variable {
        let id = self.ids.allocate();
        let variable = Variable {
            name: decl.name,
            var_type: decl.var_type,
            width: decl.width,
            id,
        };
        let index = self.push(variable);
        &self.entries[index].variable
    }

    /// Insert a variable discovered in a trace header.
    ///
    /// Returns `false` (and leaves the catalog untouched) when the qualified
    /// name is already present.
    pub fn insert(&mut self, variable: Variable) -> bool {
        if self.by_name.contains_key(&variable.name) {
            return false;
        }
        self.push(variable);
        true
    }

    fn push(&mut self, variable: Variable) -> usize {
        let index = self.entries.len();
        let codec = Codec::for_type(variable.var_type, variable.width);
        self.by_name.insert(variable.name.clone(), index);
        self.by_id.entry(variable.id.clone()).or_default().push(index);
        self.entries.push(CatalogEntry { variable, codec });
        index
    }

    /// Look up a variable by qualified name
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.by_name.get(name).map(|&i| &self.entries[i].variable)
    }

    /// Mutable entry by qualified name, for encoding
    pub fn entry_mut(&mut self, name: &str) -> Option<&mut CatalogEntry> {
        let index = *self.by_name.get(name)?;
        self.entries.get_mut(index)
    }

    /// First variable declared with this identifier
    pub fn by_id(&self, id: &str) -> Option<&Variable> {
        self.by_id
            .get(id)
            .and_then(|indices| indices.first())
            .map(|&i| &self.entries[i].variable)
    }

    /// Codec bound to an identifier
    pub fn codec_for_id(&self, id: &str) -> Option<&Codec> {
        self.by_id
            .get(id)
            .and_then(|indices| indices.first())
            .map(|&i| &self.entries[i].codec)
    }

    /// Every qualified name sharing this identifier
    pub fn names_for_id<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.by_id
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| self.entries[i].variable.name.as_str())
    }

    /// Variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().map(|e| &e.variable)
    }

    /// Name-keyed view, matching the names used when writing
    pub fn by_name_map(&self) -> HashMap<&str, &Variable> {
        self.variables().map(|v| (v.name.as_str(), v)).collect()
    }
}

/// Scope segments and local names end up as single tokens in header records
fn check_name(part: &str, full: &str) -> Result<()> {
    if part.is_empty() || part.chars().any(char::is_whitespace) {
        return Err(VcdError::InvalidName(full.to_string()));
    }
    Ok(())
}
