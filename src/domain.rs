//! Mapping between members and bit positions

use std::collections::HashMap;

use crate::base::{byte_width, Bit, Len, Member};
use crate::error::{Error, Result};

/// Maps a member to a position in the bit arrays.
///
/// Bit positions are dense and assigned in first-seen order; the domain
/// never shrinks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    /// Member -> Bit, used to build the mask of a set of members
    bits: HashMap<Member, Bit>,

    /// Bit -> Member
    members: Vec<Member>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a domain whose bit assignment follows the order of `members`.
    ///
    /// A member listed twice keeps the bit of its first occurrence.
    pub fn from_members<I: IntoIterator<Item = Member>>(members: I) -> Self {
        let mut domain = Self::new();
        for member in members {
            domain.add(member);
        }
        domain
    }

    /// Adds a member and returns its bit (existing members keep theirs)
    pub fn add(&mut self, member: Member) -> Bit {
        if let Some(&bit) = self.bits.get(&member) {
            return bit;
        }

        let bit = self.members.len() as Bit;
        self.bits.insert(member, bit);
        self.members.push(member);
        bit
    }

    /// Returns the bit of the member
    pub fn bit(&self, member: Member) -> Result<Bit> {
        self.bits
            .get(&member)
            .copied()
            .ok_or(Error::UnknownMember(member))
    }

    /// Returns the member for the bit.
    ///
    /// Panics if `bit` is not a bit of this domain.
    pub fn member(&self, bit: Bit) -> Member {
        self.members[bit as usize]
    }

    pub fn contains(&self, member: Member) -> bool {
        self.bits.contains_key(&member)
    }

    /// Members ordered by bit position
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of bytes a dense bit array over this domain would take
    pub fn byte_width(&self) -> usize {
        byte_width(self.members.len())
    }

    /// Translates members into their bits; fails on the first unknown member
    pub fn mask(&self, members: &[Member]) -> Result<Vec<Bit>> {
        members.iter().map(|&member| self.bit(member)).collect()
    }
}

impl Len for Domain {
    /// Size of the domain, which is also the number of bits
    fn len(&self) -> usize {
        self.members.len()
    }
}
