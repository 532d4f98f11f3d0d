//! Main data structure: a domain and a table of bit vectors

use std::collections::HashSet;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::base::{Key, Len, Member};
use crate::bitvector::BitVector;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::result::QueryResult;
use crate::table::Table;

/// The four query operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Any,
    All,
    NotAny,
    NotAll,
}

impl Operator {
    /// Evaluates the operator on a bit vector
    #[inline]
    fn matches(self, vector: &BitVector, bits: &[u32]) -> bool {
        match self {
            Operator::Any => vector.any(bits),
            Operator::All => vector.all(bits),
            Operator::NotAny => vector.not_any(bits),
            Operator::NotAll => vector.not_all(bits),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Operator::Any => "any",
            Operator::All => "all",
            Operator::NotAny => "nany",
            Operator::NotAll => "nall",
        })
    }
}

/// A combined query: one member list per operator.
///
/// Empty lists are skipped; the key sets of the others are intersected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub any: Vec<Member>,
    pub all: Vec<Member>,
    #[serde(alias = "nany")]
    pub not_any: Vec<Member>,
    #[serde(alias = "nall")]
    pub not_all: Vec<Member>,
}

impl Query {
    /// Operators with a non-empty member list, in evaluation order
    pub fn operators(&self) -> impl Iterator<Item = (Operator, &[Member])> {
        [
            (Operator::Any, self.any.as_slice()),
            (Operator::All, self.all.as_slice()),
            (Operator::NotAny, self.not_any.as_slice()),
            (Operator::NotAll, self.not_all.as_slice()),
        ]
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.operators().next().is_none()
    }
}

/// Summary statistics of an index
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatistics {
    pub domain_size: usize,
    pub table_size: usize,
    pub allocated_bytes: usize,
    /// `None` when the table is empty
    pub sparsity: Option<f32>,
}

/// Combines a domain and a table.
///
/// Every bit stored in the table is a bit of the domain, since bits are only
/// produced by [`Domain::add`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    domain: Domain,
    table: Table,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index over a pre-seeded domain
    pub fn with_domain(domain: Domain) -> Self {
        Self {
            domain,
            table: Table::new(),
        }
    }

    pub(crate) fn from_parts(domain: Domain, table: Table) -> Self {
        Self { domain, table }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Records that `key` has `member`, growing the domain if needed
    pub fn add(&mut self, key: Key, member: Member) {
        let bit = self.domain.add(member);
        self.table.set(key, bit);
    }

    /// Returns true if the key has the member
    pub fn has(&self, key: Key, member: Member) -> Result<bool> {
        let bit = self.domain.bit(member)?;
        Ok(self.table.get(key).map_or(false, |vector| vector.has(bit)))
    }

    /// Returns the keys matching `operator` for the members
    pub fn evaluate(&self, operator: Operator, members: &[Member]) -> Result<Vec<Key>> {
        let bits = self.domain.mask(members)?;

        let keys: Vec<Key> = self
            .table
            .iter()
            .filter(|(_, vector)| operator.matches(vector, &bits))
            .map(|(&key, _)| key)
            .collect();

        debug!(
            "{} over {} members matched {} keys",
            operator,
            members.len(),
            keys.len()
        );
        Ok(keys)
    }

    /// Keys that have any of the members
    pub fn any(&self, members: &[Member]) -> Result<Vec<Key>> {
        self.evaluate(Operator::Any, members)
    }

    /// Keys that have all of the members
    pub fn all(&self, members: &[Member]) -> Result<Vec<Key>> {
        self.evaluate(Operator::All, members)
    }

    /// Keys that have none of the members
    pub fn not_any(&self, members: &[Member]) -> Result<Vec<Key>> {
        self.evaluate(Operator::NotAny, members)
    }

    /// Keys that lack at least one of the members
    pub fn not_all(&self, members: &[Member]) -> Result<Vec<Key>> {
        self.evaluate(Operator::NotAll, members)
    }

    /// Runs a combined query.
    ///
    /// The first non-empty operator seeds the key set, the following ones
    /// are intersected into it. A failing operator aborts the whole query.
    pub fn query(&self, query: &Query) -> Result<QueryResult<'_>> {
        let mut keys: Option<HashSet<Key>> = None;

        for (operator, members) in query.operators() {
            let matched = self
                .evaluate(operator, members)
                .map_err(|source| Error::Operation {
                    operator,
                    source: Box::new(source),
                })?;

            keys = Some(match keys {
                None => matched.into_iter().collect(),
                Some(mut current) => {
                    let matched: HashSet<Key> = matched.into_iter().collect();
                    current.retain(|key| matched.contains(key));
                    current
                }
            });
        }

        let keys = keys.ok_or(Error::EmptyQuery)?;
        Ok(QueryResult::new(keys, self))
    }

    /// Same as [`Index::query`] with the four member lists
    pub fn query_with(
        &self,
        any: &[Member],
        all: &[Member],
        not_any: &[Member],
        not_all: &[Member],
    ) -> Result<QueryResult<'_>> {
        self.query(&Query {
            any: any.to_vec(),
            all: all.to_vec(),
            not_any: not_any.to_vec(),
            not_all: not_all.to_vec(),
        })
    }

    /// `1 - (average allocated bytes per key) / (domain byte width)`
    pub fn sparsity(&self) -> Result<f32> {
        if self.table.is_empty() {
            return Err(Error::EmptyTable);
        }
        let width = self.domain.byte_width();
        if width == 0 {
            return Err(Error::EmptyDomain);
        }

        let average = self.table.allocated_bytes() as f32 / self.table.len() as f32;
        Ok(1. - average / width as f32)
    }

    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            domain_size: self.domain.len(),
            table_size: self.table.len(),
            allocated_bytes: self.table.allocated_bytes(),
            sparsity: self.sparsity().ok(),
        }
    }
}

impl Extend<(Key, Member)> for Index {
    fn extend<T: IntoIterator<Item = (Key, Member)>>(&mut self, pairs: T) {
        for (key, member) in pairs {
            self.add(key, member);
        }
    }
}

impl FromIterator<(Key, Member)> for Index {
    fn from_iter<T: IntoIterator<Item = (Key, Member)>>(pairs: T) -> Self {
        let mut index = Index::new();
        index.extend(pairs);
        index
    }
}
