//! End to end checks over whole functions: parse, build, eliminate, render.

use flowviz_core::{ControlFlowGraph, EdgeCondition, FlowGraphNode, NodeIndex};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn build(source: &str) -> ControlFlowGraph {
    let file = syn::parse_file(source).expect("source parses");
    ControlFlowGraph::from_file(&file).expect("source builds")
}

fn build_eliminated(source: &str) -> ControlFlowGraph {
    let mut graph = build(source);
    graph.eliminate_jumps();
    graph
}

fn node_ix(graph: &ControlFlowGraph, label: &str) -> NodeIndex {
    graph
        .node_with_label(label)
        .unwrap_or_else(|| panic!("no node labeled {label:?}"))
}

fn ordered_labels(graph: &ControlFlowGraph) -> Vec<(u32, String)> {
    let mut labels: Vec<(u32, String)> = graph
        .node_indices()
        .filter_map(|index| {
            let node = graph.node(index);
            node.order().map(|order| (order, node.label().to_string()))
        })
        .collect();
    labels.sort();
    labels
}

const GCD: &str = indoc! {"
    fn gcd(a: u64, b: u64) -> u64 {
        let mut x = a;
        let mut y = b;
        while y != 0 {
            let t = y;
            y = x % y;
            x = t;
        }
        x
    }
"};

#[test]
fn gcd_has_one_loop_and_no_placeholders() {
    let graph = build(GCD);

    assert_eq!(graph.node_count(), 8);
    assert_eq!(graph.edge_count(), 8);
    assert_eq!(graph.entry_points().len(), 1);
    assert!(matches!(
        graph.node(graph.entry_points()[0]),
        FlowGraphNode::Entry { .. }
    ));

    let test = node_ix(&graph, "y != 0");
    let first = node_ix(&graph, "let t = y");
    let last = node_ix(&graph, "x = t");
    let result = node_ix(&graph, "x");

    assert_eq!(graph.edge_between(test, first), Some(EdgeCondition::True));
    assert_eq!(graph.edge_between(last, test), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.edge_between(test, result), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.exit_points(), &[result]);

    // nothing to splice, so elimination leaves the graph alone
    let mut eliminated = build(GCD);
    eliminated.eliminate_jumps();
    assert_eq!(eliminated.node_count(), graph.node_count());
    assert_eq!(eliminated.edge_count(), graph.edge_count());
}

#[test]
fn gcd_orders_follow_the_traversal() {
    let graph = build(GCD);
    assert_eq!(
        ordered_labels(&graph),
        vec![
            (0, "fn gcd(a, b)".to_string()),
            (1, "let mut x = a".to_string()),
            (2, "let mut y = b".to_string()),
            (3, "y != 0".to_string()),
            (4, "let t = y".to_string()),
            (5, "y = x % y".to_string()),
            (6, "x = t".to_string()),
            (7, "x".to_string()),
        ]
    );
}

const CLASSIFY: &str = indoc! {"
    fn classify(n: i64) -> i64 {
        if n < 0 {
            return -1;
        } else if n == 0 {
            return 0;
        }
        1
    }
"};

#[test]
fn early_returns_leave_only_the_open_paths() {
    let graph = build(CLASSIFY);

    let negative_test = node_ix(&graph, "n < 0");
    let zero_test = node_ix(&graph, "n == 0");
    let negative = node_ix(&graph, "return -1");
    let zero = node_ix(&graph, "return 0");
    let fallthrough = node_ix(&graph, "1");

    assert_eq!(
        graph.edge_between(negative_test, negative),
        Some(EdgeCondition::True)
    );
    assert_eq!(
        graph.edge_between(negative_test, zero_test),
        Some(EdgeCondition::False)
    );
    assert_eq!(graph.edge_between(zero_test, zero), Some(EdgeCondition::True));
    assert_eq!(
        graph.edge_between(zero_test, fallthrough),
        Some(EdgeCondition::Unconditional)
    );

    assert!(graph.node(negative).is_sink());
    assert!(graph.node(zero).is_sink());
    assert_eq!(graph.successors(negative), vec![]);
    assert_eq!(graph.successors(zero), vec![]);
    assert_eq!(graph.exit_points(), &[fallthrough]);
}

const DRAIN: &str = indoc! {r#"
    fn drain(queue: Queue) {
        while queue.ready() {
            let item = queue.next();
            if item.poisoned() {
                break;
            }
            if item.stale() {
                continue;
            }
            handle(item);
        }
        report();
    }
"#};

#[test]
fn breaks_and_continues_resolve_to_their_loop_targets() {
    let graph = build_eliminated(DRAIN);

    let loop_test = node_ix(&graph, "queue.ready()");
    let poisoned = node_ix(&graph, "item.poisoned()");
    let stale = node_ix(&graph, "item.stale()");
    let handle = node_ix(&graph, "handle(item)");
    let report = node_ix(&graph, "report()");

    // break: from its own branch test straight past the loop
    assert_eq!(graph.edge_between(poisoned, report), Some(EdgeCondition::True));
    // continue: from its own branch test back to the loop test
    assert_eq!(graph.edge_between(stale, loop_test), Some(EdgeCondition::True));
    // the ordinary paths are untouched
    assert_eq!(graph.edge_between(poisoned, stale), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.edge_between(stale, handle), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.edge_between(handle, loop_test), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.edge_between(loop_test, report), Some(EdgeCondition::Unconditional));

    let placeholders = graph
        .node_indices()
        .filter(|index| graph.node(*index).is_jump())
        .count();
    assert_eq!(placeholders, 0);
}

#[test]
fn placeholders_reserve_no_order_numbers() {
    let graph = build(DRAIN);
    assert_eq!(
        ordered_labels(&graph),
        vec![
            (0, "fn drain(queue)".to_string()),
            (1, "queue.ready()".to_string()),
            (2, "let item = queue.next()".to_string()),
            (3, "item.poisoned()".to_string()),
            (4, "item.stale()".to_string()),
            (5, "handle(item)".to_string()),
            (6, "report()".to_string()),
        ]
    );
}

#[test]
fn rendered_output_reflects_kind_and_condition() {
    let graph = build_eliminated(DRAIN);
    let dot = graph.to_dot();

    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("label = \"0. fn drain(queue)\" shape = ellipse"));
    assert!(dot.contains("label = \"1. queue.ready()\" shape = diamond"));
    assert!(dot.contains("label = \"5. handle(item)\" shape = box"));
    assert!(dot.contains("color = \"#00FF00\""));
    assert!(dot.contains("color = \"#000000\""));
    assert!(!dot.contains("egg"));
}

#[test]
fn a_for_loop_over_a_collection_counts_matches() {
    let graph = build_eliminated(indoc! {"
        fn count_even(values: Vec<u32>) -> u32 {
            let mut count = 0;
            for value in values {
                if value % 2 != 0 {
                    continue;
                }
                count = count + 1;
            }
            count
        }
    "});

    let membership = node_ix(&graph, "value in values");
    let odd = node_ix(&graph, "value % 2 != 0");
    let increment = node_ix(&graph, "count = count + 1");
    let result = node_ix(&graph, "count");

    assert!(matches!(
        graph.node(membership),
        FlowGraphNode::Condition { .. }
    ));
    assert_eq!(graph.edge_between(odd, membership), Some(EdgeCondition::True));
    assert_eq!(graph.edge_between(increment, membership), Some(EdgeCondition::Unconditional));
    assert_eq!(graph.edge_between(membership, result), Some(EdgeCondition::Unconditional));
}
