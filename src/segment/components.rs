use std::collections::HashSet;

use crate::{foundation::core::PixelIndex, raster::grid::Grid};

/// Connected components of a pixel set under 8-adjacency.
///
/// `seeds` fixes the emission order: components appear in the order of their
/// first seed, and pixels within a component in flood-fill visitation order.
/// `member` restricts the fill to the set; `linked(a, b)` may cut individual
/// adjacencies. The fill uses an explicit stack, never recursion.
pub(crate) fn connected_components<S, M, L>(
    grid: Grid,
    seeds: S,
    member: M,
    linked: L,
) -> Vec<Vec<PixelIndex>>
where
    S: IntoIterator<Item = PixelIndex>,
    M: Fn(PixelIndex) -> bool,
    L: Fn(PixelIndex, PixelIndex) -> bool,
{
    let mut components = Vec::new();
    let mut visited = HashSet::<PixelIndex>::new();
    let mut stack = Vec::<PixelIndex>::new();

    for seed in seeds {
        if visited.contains(&seed) || !member(seed) {
            continue;
        }

        let mut component = Vec::new();
        stack.push(seed);
        while let Some(p) = stack.pop() {
            if !visited.insert(p) {
                continue;
            }
            component.push(p);
            stack.extend(
                grid.neighbors(p)
                    .filter(|&n| !visited.contains(&n) && member(n) && linked(p, n)),
            );
        }
        components.push(component);
    }

    components
}

/// Components of an explicit pixel list, keeping the list's order for seeding.
pub(crate) fn components_of(grid: Grid, pixels: &[PixelIndex]) -> Vec<Vec<PixelIndex>> {
    let set: HashSet<PixelIndex> = pixels.iter().copied().collect();
    connected_components(grid, pixels.iter().copied(), |p| set.contains(&p), |_, _| true)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/components.rs"]
mod tests;
