use super::*;

fn flat(buckets: &[Vec<usize>]) -> Vec<usize> {
    let mut all: Vec<usize> = buckets.iter().flatten().copied().collect();
    all.sort_unstable();
    all
}

fn limited(limit: usize) -> DistributeOpts {
    DistributeOpts {
        limit: Some(limit),
        cyclic: false,
    }
}

#[test]
fn five_items_over_ten_buckets_follow_the_stride() {
    let b = distribute(5, 10, DistributeOpts::default()).unwrap();
    assert_eq!(b.len(), 10);
    let used: Vec<usize> = (0..10).filter(|&i| !b[i].is_empty()).collect();
    assert_eq!(used, vec![0, 2, 5, 7, 9]);
    assert_eq!(b[0], vec![0]);
    assert_eq!(b[2], vec![1]);
    assert_eq!(b[5], vec![2]);
    assert_eq!(b[7], vec![3]);
    assert_eq!(b[9], vec![4]);
}

#[test]
fn over_capacity_is_rejected_up_front() {
    let err = distribute(11, 10, limited(1)).unwrap_err();
    assert!(matches!(
        err,
        StrokeError::InfeasibleDistribution {
            items: 11,
            buckets: 10,
            limit: 1
        }
    ));
}

#[test]
fn cyclic_leaves_the_tail_for_wraparound() {
    let b = distribute(
        4,
        8,
        DistributeOpts {
            limit: None,
            cyclic: true,
        },
    )
    .unwrap();
    let used: Vec<usize> = (0..8).filter(|&i| !b[i].is_empty()).collect();
    assert_eq!(used, vec![0, 2, 4, 6]);
}

#[test]
fn every_item_lands_exactly_once() {
    for cyclic in [false, true] {
        for buckets in 1..12 {
            for len in 0..30 {
                let b = distribute(len, buckets, DistributeOpts { limit: None, cyclic }).unwrap();
                assert_eq!(b.len(), buckets);
                assert_eq!(flat(&b), (0..len).collect::<Vec<_>>(), "len {len} buckets {buckets}");
            }
        }
    }
}

#[test]
fn limits_are_never_exceeded() {
    for cyclic in [false, true] {
        for limit in 1..4 {
            for buckets in 1..15 {
                for len in 0..=buckets * limit {
                    let opts = DistributeOpts {
                        limit: Some(limit),
                        cyclic,
                    };
                    let b = distribute(len, buckets, opts).unwrap();
                    assert!(b.iter().all(|x| x.len() <= limit));
                    assert_eq!(flat(&b), (0..len).collect::<Vec<_>>());
                }
            }
        }
    }
}

#[test]
fn empty_inputs() {
    assert_eq!(distribute(0, 3, DistributeOpts::default()).unwrap(), vec![
        Vec::<usize>::new(),
        Vec::new(),
        Vec::new()
    ]);
    assert!(distribute(0, 0, DistributeOpts::default()).unwrap().is_empty());
    assert!(matches!(
        distribute(1, 0, DistributeOpts::default()),
        Err(StrokeError::InfeasibleDistribution { buckets: 0, .. })
    ));
    assert!(matches!(
        distribute(2, 4, limited(0)),
        Err(StrokeError::InfeasibleDistribution { limit: 0, .. })
    ));
}

#[test]
fn single_item_sits_in_first_bucket() {
    let b = distribute(1, 5, DistributeOpts::default()).unwrap();
    assert_eq!(b[0], vec![0]);
    assert!(b[1..].iter().all(Vec::is_empty));
}

#[test]
fn overflow_cascades_toward_the_middle() {
    let mut left: Vec<VecDeque<usize>> = vec![[0].into(), [1].into(), VecDeque::new()];
    insert_cascading(&mut left, 2, 0, 1);
    assert_eq!(left, vec![VecDeque::from([2]), [0].into(), [1].into()]);

    let mut right: Vec<VecDeque<usize>> = vec![VecDeque::new(), [5].into(), [6].into()];
    insert_cascading(&mut right, 7, 2, 1);
    assert_eq!(right, vec![VecDeque::from([5]), [6].into(), [7].into()]);
}

#[test]
fn cascade_turns_around_at_the_edge() {
    let mut slots: Vec<VecDeque<usize>> = vec![VecDeque::new(), [1].into(), [2].into()];
    insert_cascading(&mut slots, 0, 1, 1);
    assert_eq!(slots, vec![VecDeque::from([0]), [2].into(), [1].into()]);
}
