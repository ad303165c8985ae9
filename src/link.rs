//! Testing whether two ends are joined by a link.

use crate::graph::EndView;
use crate::graph::Graph;

/// Returns whether `a` and `b` belong to the same group and are joined by
/// that group's link.
///
/// Both ends are compared in positive orientation, and the link may join
/// them in either order. An end without a group, or whose group carries no
/// link, is never linked.
///
/// # Examples
///
/// ```
/// use cactus_export::graph::Builder;
/// use cactus_export::graph::EndView;
/// use cactus_export::link::is_linked;
///
/// let graph = Builder::default()
///     .scope("0")?
///     .group("g0", "0", None)?
///     .end("e0", Some("g0"))?
///     .end("e1", Some("g0"))?
///     .end("e2", Some("g0"))?
///     .link("g0", "e0", "e1")?
///     .try_build()?;
///
/// let ends = graph.end_ids().map(EndView::forward).collect::<Vec<_>>();
/// let (e0, e1, e2) = (ends[0], ends[1], ends[2]);
///
/// assert!(is_linked(&graph, e0, e1));
/// assert!(is_linked(&graph, e1.reverse(), e0));
/// assert!(!is_linked(&graph, e0, e2));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn is_linked(graph: &Graph, a: EndView, b: EndView) -> bool {
    let Some(group) = a.group(graph) else {
        return false;
    };

    if b.group(graph) != Some(group) {
        return false;
    }

    let Some(link) = graph.group(group).link() else {
        return false;
    };

    let (a, b) = (a.positive().id(), b.positive().id());

    (link.end5() == a && link.end3() == b) || (link.end5() == b && link.end3() == a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Builder;

    fn ends(graph: &Graph) -> Vec<EndView> {
        graph.end_ids().map(EndView::forward).collect()
    }

    #[test]
    fn ends_in_different_groups_are_never_linked() -> Result<(), Box<dyn std::error::Error>> {
        let graph = Builder::default()
            .scope("0")?
            .group("g0", "0", None)?
            .group("g1", "0", None)?
            .end("e0", Some("g0"))?
            .end("e1", Some("g0"))?
            .end("e2", Some("g1"))?
            .end("e3", Some("g1"))?
            .link("g0", "e0", "e1")?
            .link("g1", "e2", "e3")?
            .try_build()?;

        let ends = ends(&graph);

        for a in &ends {
            for b in &ends {
                assert_eq!(is_linked(&graph, *a, *b), is_linked(&graph, *b, *a));
            }
        }

        assert!(is_linked(&graph, ends[0], ends[1]));
        assert!(is_linked(&graph, ends[3], ends[2]));
        assert!(!is_linked(&graph, ends[1], ends[2]));
        assert!(!is_linked(&graph, ends[2], ends[1]));

        Ok(())
    }

    #[test]
    fn it_is_symmetric_within_a_group() -> Result<(), Box<dyn std::error::Error>> {
        let graph = Builder::default()
            .scope("0")?
            .group("g0", "0", None)?
            .end("e0", Some("g0"))?
            .end("e1", Some("g0"))?
            .end("e2", Some("g0"))?
            .link("g0", "e1", "e2")?
            .try_build()?;

        let ends = ends(&graph);

        for a in &ends {
            for b in &ends {
                assert_eq!(is_linked(&graph, *a, *b), is_linked(&graph, *b, *a));
            }
        }

        assert!(is_linked(&graph, ends[1], ends[2].reverse()));
        assert!(is_linked(&graph, ends[2].reverse(), ends[1].reverse()));
        assert!(!is_linked(&graph, ends[0], ends[1]));

        Ok(())
    }

    #[test]
    fn ends_without_groups_are_never_linked() -> Result<(), Box<dyn std::error::Error>> {
        let graph = Builder::default()
            .scope("0")?
            .end("e0", None)?
            .end("e1", None)?
            .try_build()?;

        let ends = ends(&graph);
        assert!(!is_linked(&graph, ends[0], ends[1]));

        Ok(())
    }
}
