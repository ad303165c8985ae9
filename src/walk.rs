//! Depth-first traversal of nested scopes.

use crate::graph::Graph;
use crate::graph::ScopeId;

/// Visits `root` and then, depth first and in group order, every scope
/// nested beneath it.
///
/// The root has depth 0. Children of a scope at depth `d` are only visited
/// when `d` is below `depth_limit`; a limit of [`None`] descends to the
/// leaves. The first error returned by `visit` stops the walk.
///
/// # Examples
///
/// ```
/// use cactus_export::graph::Builder;
/// use cactus_export::walk::walk;
///
/// let graph = Builder::default()
///     .scope("0")?
///     .scope("1")?
///     .scope("2")?
///     .group("g0", "0", Some("1"))?
///     .group("g1", "1", Some("2"))?
///     .try_build()?;
///
/// let root = graph.scope_by_name("0").unwrap();
///
/// let mut visited = Vec::new();
/// walk(&graph, root, Some(1), &mut |scope, depth| {
///     visited.push((graph.scope(scope).name().to_string(), depth));
///     Ok::<(), std::convert::Infallible>(())
/// })?;
///
/// assert_eq!(visited, vec![(String::from("0"), 0), (String::from("1"), 1)]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn walk<E>(
    graph: &Graph,
    root: ScopeId,
    depth_limit: Option<usize>,
    visit: &mut impl FnMut(ScopeId, usize) -> Result<(), E>,
) -> Result<(), E> {
    descend(graph, root, 0, depth_limit, visit)
}

/// Visits `scope` at `depth` and recurses into its children.
fn descend<E>(
    graph: &Graph,
    scope: ScopeId,
    depth: usize,
    depth_limit: Option<usize>,
    visit: &mut impl FnMut(ScopeId, usize) -> Result<(), E>,
) -> Result<(), E> {
    visit(scope, depth)?;

    if depth_limit.is_some_and(|limit| depth >= limit) {
        return Ok(());
    }

    for child in graph.children(scope) {
        descend(graph, child, depth + 1, depth_limit, visit)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Builder;

    /// A root with two children, the first of which has a child of its own.
    fn graph() -> Result<Graph, Box<dyn std::error::Error>> {
        Ok(Builder::default()
            .scope("root")?
            .scope("left")?
            .scope("right")?
            .scope("leaf")?
            .group("g0", "root", Some("left"))?
            .group("g1", "root", None)?
            .group("g2", "root", Some("right"))?
            .group("g3", "left", Some("leaf"))?
            .try_build()?)
    }

    fn visit(graph: &Graph, limit: Option<usize>) -> Vec<(String, usize)> {
        let root = graph.scope_by_name("root").unwrap();
        let mut visited = Vec::new();

        walk(graph, root, limit, &mut |scope, depth| {
            visited.push((graph.scope(scope).name().to_string(), depth));
            Ok::<(), std::convert::Infallible>(())
        })
        .unwrap();

        visited
    }

    fn names(visited: &[(String, usize)]) -> Vec<&str> {
        visited.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn unlimited_walks_reach_every_scope_depth_first() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let visited = visit(&graph, None);

        assert_eq!(
            visited,
            vec![
                (String::from("root"), 0),
                (String::from("left"), 1),
                (String::from("leaf"), 2),
                (String::from("right"), 1),
            ]
        );

        Ok(())
    }

    #[test]
    fn a_zero_limit_visits_only_the_root() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        assert_eq!(names(&visit(&graph, Some(0))), vec!["root"]);
        Ok(())
    }

    #[test]
    fn limits_bound_the_depth() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        assert_eq!(names(&visit(&graph, Some(1))), vec!["root", "left", "right"]);
        assert_eq!(names(&visit(&graph, Some(2))), names(&visit(&graph, None)));
        Ok(())
    }

    #[test]
    fn errors_stop_the_walk() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let root = graph.scope_by_name("root").unwrap();
        let mut count = 0;

        let result = walk(&graph, root, None, &mut |scope, _| {
            count += 1;

            if graph.scope(scope).name() == "left" {
                Err("stop")
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err("stop"));
        assert_eq!(count, 2);

        Ok(())
    }
}
