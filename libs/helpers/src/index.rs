use std::collections::{HashMap, HashSet};

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::records::{create_record, TestRecord};
use bitindex::base::{Key, Len, Member};
use bitindex::index::Index;

/// A random index together with the pairs it was built from
pub struct TestIndex {
    pub domain_size: usize,
    pub members: HashMap<Key, HashSet<Member>>,
    pub records: Vec<TestRecord>,
    pub index: Index,
}

impl TestIndex {
    pub fn new(
        domain_size: usize,
        key_count: u32,
        lambda_members: f32,
        max_members: usize,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let mut index = Index::new();
        let mut members = HashMap::<Key, HashSet<Member>>::new();
        let mut records = Vec::<TestRecord>::new();

        // Spread the keys to get several bytes per vector offset
        for ix in 0..key_count {
            let key = ix * 7 + 3;
            let record = create_record(key, lambda_members, max_members, domain_size, &mut rng);

            for &member in record.members.iter() {
                index.add(key, member);
                members.entry(key).or_default().insert(member);
            }

            records.push(record);
        }

        debug!(
            "Test index with {} keys and {} members",
            index.table().len(),
            index.domain().len()
        );

        Self {
            domain_size,
            members,
            records,
            index,
        }
    }

    /// Keys matching a predicate over their member sets
    pub fn expected<F>(&self, predicate: F) -> HashSet<Key>
    where
        F: Fn(&HashSet<Member>) -> bool,
    {
        self.members
            .iter()
            .filter(|(_, members)| predicate(members))
            .map(|(&key, _)| key)
            .collect()
    }
}

/// Test if two indices hold the same domain and memberships
pub fn check_same_index(expected: &Index, observed: &Index) {
    assert_eq!(
        expected.domain().members(),
        observed.domain().members(),
        "Domains differ"
    );

    let mut expected_keys = expected.table().keys();
    let mut observed_keys = observed.table().keys();
    expected_keys.sort();
    observed_keys.sort();
    assert_eq!(expected_keys, observed_keys, "Keys differ");

    for &key in expected_keys.iter() {
        for &member in expected.domain().members() {
            assert_eq!(
                expected.has(key, member).unwrap(),
                observed.has(key, member).unwrap(),
                "Membership of {} for key {} differs",
                member,
                key
            );
        }
        assert_eq!(
            expected.table().get(key).unwrap().allocated_bytes(),
            observed.table().get(key).unwrap().allocated_bytes(),
            "Allocated bytes differ for key {}",
            key
        );
    }
}
