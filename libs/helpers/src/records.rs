use rand::{self, RngCore};
use rand_distr::{Distribution, Poisson};
use std::cmp::min;

use bitindex::base::{Key, Member};

/// A key together with the members it has
pub struct TestRecord {
    pub key: Key,
    pub members: Vec<Member>,
}

/// Draws a record with a Poisson-distributed number of distinct members
/// taken from `0..domain_size`
pub fn create_record(
    key: Key,
    lambda_members: f32,
    max_members: usize,
    domain_size: usize,
    rng: &mut dyn RngCore,
) -> TestRecord {
    let poi = Poisson::new(lambda_members).unwrap();
    let num_members = 1 + poi.sample(rng) as usize;

    let members = rand::seq::index::sample(
        rng,
        domain_size,
        min(min(num_members, max_members), domain_size),
    )
    .into_iter()
    .map(|ix| ix as Member)
    .collect();

    TestRecord { key, members }
}
