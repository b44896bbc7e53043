use super::*;

#[test]
fn splits_disconnected_runs() {
    let g = Grid::new(5, 1);
    let comps = components_of(g, &[0, 1, 3, 4]);
    assert_eq!(comps.len(), 2);
    assert_eq!(comps[0].len(), 2);
    assert_eq!(comps[1].len(), 2);
    assert_eq!(comps[0][0], 0);
    assert_eq!(comps[1][0], 3);
}

#[test]
fn diagonal_touch_connects() {
    let g = Grid::new(3, 3);
    let comps = components_of(g, &[g.index(0, 0), g.index(1, 1), g.index(2, 2)]);
    assert_eq!(comps.len(), 1);
    assert_eq!(comps[0].len(), 3);
}

#[test]
fn linked_predicate_cuts_edges() {
    let g = Grid::new(3, 1);
    let comps = connected_components(g, 0..3, |_| true, |a, b| !(a == 1 || b == 1));
    assert_eq!(comps, vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn seeds_outside_member_set_are_skipped() {
    let g = Grid::new(3, 1);
    let comps = connected_components(g, 0..3, |p| p != 1, |_, _| true);
    assert_eq!(comps, vec![vec![0], vec![2]]);
}

#[test]
fn large_fill_does_not_recurse() {
    let g = Grid::new(512, 512);
    let comps = connected_components(g, 0..g.len(), |_| true, |_, _| true);
    assert_eq!(comps.len(), 1);
    assert_eq!(comps[0].len(), g.len());
}
