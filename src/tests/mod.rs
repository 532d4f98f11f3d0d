#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::base::Len;
    use crate::domain::Domain;
    use crate::error::Error;
    use crate::index::{Index, Operator, Query};
    use crate::table::Table;

    const FRUITS: [u32; 4] = [
        1, // Apple
        2, // Cherry
        3, // Peach
        4, // Grape
    ];

    const PAIRS: [(u32, u32); 6] = [(100, 1), (100, 3), (101, 4), (102, 4), (102, 2), (102, 3)];

    fn fruit_index() -> Index {
        let mut index = Index::with_domain(Domain::from_members(FRUITS));
        index.extend(PAIRS);
        index
    }

    fn sorted(mut keys: Vec<u32>) -> Vec<u32> {
        keys.sort();
        keys
    }

    #[test]
    fn test_index() {
        let index = fruit_index();

        assert_eq!(index.table().len(), 3);

        // The domain fits in one byte for each of the three keys
        assert_eq!(index.table().allocated_bytes(), 3);

        // All required bytes are allocated
        assert_eq!(index.sparsity().unwrap(), 0.);
    }

    #[test]
    fn test_operators() {
        let index = fruit_index();

        assert_eq!(sorted(index.any(&[1, 2]).unwrap()), vec![100, 102]);
        assert_eq!(sorted(index.all(&[1, 3]).unwrap()), vec![100]);
        assert_eq!(sorted(index.not_any(&[3, 1]).unwrap()), vec![101]);
        assert_eq!(sorted(index.not_all(&[4, 2]).unwrap()), vec![100, 101]);
    }

    #[test]
    fn test_unknown_member() {
        let index = fruit_index();

        assert!(matches!(index.any(&[999]), Err(Error::UnknownMember(999))));
        assert!(matches!(index.has(100, 999), Err(Error::UnknownMember(999))));
    }

    #[test]
    fn test_query() {
        let index = fruit_index();

        // any(3, 4) = {100, 101, 102}, nall(2, 4) = {100, 101}
        let query = Query {
            any: vec![3, 4],
            not_all: vec![2, 4],
            ..Default::default()
        };
        let result = index.query(&query).unwrap();
        assert_eq!(sorted(result.items()), vec![100, 101]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.complement(), vec![102]);
        assert!(result.contains(101));
        assert!(!result.contains(102));

        assert!(!result.smaller_than_complement(0.5));
        assert!(result.smaller_than_complement(0.7));

        assert_eq!(result.into_keys(), HashSet::from([100, 101]));
    }

    #[test]
    fn test_query_failures() {
        let index = fruit_index();

        assert!(matches!(index.query(&Query::default()), Err(Error::EmptyQuery)));

        match index.query_with(&[1], &[], &[999], &[]) {
            Err(Error::Operation { operator, source }) => {
                assert_eq!(operator, Operator::NotAny);
                assert!(matches!(*source, Error::UnknownMember(999)));
            }
            other => panic!("expected a failed operation, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_complement_partition() {
        let index = fruit_index();
        let result = index.query_with(&[], &[3], &[], &[]).unwrap();

        let items: HashSet<u32> = result.items().into_iter().collect();
        let complement: HashSet<u32> = result.complement().into_iter().collect();
        let keys: HashSet<u32> = index.table().keys().into_iter().collect();

        assert!(items.is_disjoint(&complement));
        assert_eq!(&items | &complement, keys);
    }

    #[test]
    fn test_empty_table() {
        let index = Index::with_domain(Domain::from_members(FRUITS));

        assert!(matches!(index.sparsity(), Err(Error::EmptyTable)));
        assert_eq!(index.statistics().sparsity, None);

        let result = index.any(&[1]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_domain() {
        // A key with a byte but no member cannot be built with `add`
        let mut table = Table::new();
        table.set(100, 0);
        let index = Index::from_parts(Domain::new(), table);

        assert!(matches!(index.sparsity(), Err(Error::EmptyDomain)));
        assert_eq!(index.statistics().sparsity, None);
    }
}
