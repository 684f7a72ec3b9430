/// Split `items` into at most `workers` groups of `ceil(len / workers)`
/// items; the last group may be smaller.
///
/// Items are whole dialogs, so a dialog never straddles two groups. With more
/// workers than items every group holds one item and the extra workers stay
/// idle. A worker count of 0 is treated as 1.
pub fn partition<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    let step = items.len().div_ceil(workers.max(1));
    items.chunks(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn groups_are_near_equal() {
        let ids: Vec<u32> = (0..10).collect();
        let sizes: Vec<usize> = partition(&ids, 4).iter().map(|g| g.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
    }

    #[test]
    fn more_workers_than_items_gives_singletons() {
        let ids = [1, 2, 3];
        let groups = partition(&ids, 8);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() == 1));
    }

    #[test]
    fn every_item_lands_in_exactly_one_group() {
        let ids: Vec<u32> = (0..37).collect();
        for workers in 1..=40 {
            let groups = partition(&ids, workers);
            assert!(groups.len() <= workers);

            let flat: Vec<u32> = groups.iter().flat_map(|g| g.iter().copied()).collect();
            assert_eq!(flat.len(), ids.len(), "workers={workers}");
            assert_eq!(flat.iter().copied().collect::<HashSet<_>>(), ids.iter().copied().collect::<HashSet<_>>());
        }
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(partition::<u32>(&[], 4).is_empty());
        assert_eq!(partition(&[1, 2], 0).len(), 1);
    }
}
