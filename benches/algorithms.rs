use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graph_sandbox::{algorithm::*, graph::*, Request, Sandbox};
use rand::Rng;
use static_init::dynamic;
use std::rc::Rc;

#[dynamic]
static VERTEX_SIZE: usize = std::env::var("VERTEX_SIZE")
    .unwrap_or("200".to_string())
    .parse()
    .unwrap();
#[dynamic]
static EDGE_SIZE: usize = std::env::var("EDGE_SIZE")
    .unwrap_or("1000".to_string())
    .parse()
    .unwrap();

criterion_group!(benches, undirected, directed);
criterion_main!(benches);

fn random_graph(directed: bool) -> (GraphModel, Vec<NodeId>) {
    let vertex_size = *VERTEX_SIZE;
    let edge_size = *EDGE_SIZE;
    let mut rng = rand::thread_rng();
    let mut g = GraphModel::with_kind(directed, true);
    let nodes: Vec<_> = (0..vertex_size)
        .map(|i| g.add_node(Position::new(i as f64, 0.0)))
        .collect();
    for _ in 0..edge_size {
        let v0 = nodes[rng.gen::<usize>() % nodes.len()];
        let v1 = nodes[rng.gen::<usize>() % nodes.len()];
        let w = f64::from(rng.gen::<u8>() % 100);
        g.add_or_update_edge(v0, v1, w, directed).unwrap();
    }
    (g, nodes)
}

fn undirected(c: &mut Criterion) {
    println!("VERTEX_SIZE: {}", *VERTEX_SIZE);
    println!("EDGE_SIZE: {}", *EDGE_SIZE);
    let (g, nodes) = random_graph(false);
    let (first, last) = (nodes[0], nodes[nodes.len() - 1]);
    c.bench_function("undirected/build view", |b| {
        b.iter(|| AdjacencyView::build(black_box(&g)))
    });
    c.bench_function("undirected/bfs", |b| b.iter(|| bfs(&g, first).unwrap()));
    c.bench_function("undirected/dfs", |b| b.iter(|| dfs(&g, first).unwrap()));
    c.bench_function("undirected/dijkstra", |b| {
        b.iter(|| dijkstra(&g, first, last).unwrap())
    });
    c.bench_function("undirected/bipartition", |b| b.iter(|| bipartition(&g)));
    c.bench_function("undirected/prim", |b| b.iter(|| prim(&g, None).unwrap()));
    c.bench_function("undirected/kruskal", |b| b.iter(|| kruskal(&g).unwrap()));
    c.bench_function("undirected/euler", |b| b.iter(|| euler(&g, None).unwrap()));
    c.bench_function("undirected/max flow", |b| {
        b.iter(|| max_flow(&g, first, last).unwrap())
    });
    let view = Rc::new(AdjacencyView::build(&g));
    c.bench_function("undirected/dijkstra steps", |b| {
        b.iter(|| {
            dijkstra_steps(view.clone(), first, last)
                .unwrap()
                .count()
        })
    });
    c.bench_function("undirected/sandbox steps", |b| {
        let mut sandbox = Sandbox::with_graph(g.clone());
        b.iter(|| {
            sandbox.start(Request::Bfs { start: first }).unwrap();
            while sandbox.step().unwrap().is_some() {}
        })
    });
}

fn directed(c: &mut Criterion) {
    let (g, nodes) = random_graph(true);
    let (first, last) = (nodes[0], nodes[nodes.len() - 1]);
    c.bench_function("directed/dijkstra", |b| {
        b.iter(|| dijkstra(&g, first, last).unwrap())
    });
    c.bench_function("directed/max flow", |b| {
        b.iter(|| max_flow(&g, first, last).unwrap())
    });
    c.bench_function("directed/euler", |b| b.iter(|| euler(&g, None).unwrap()));
    c.bench_function("directed/snapshot", |b| {
        b.iter(|| GraphModel::from_json(&g.to_json().unwrap()).unwrap())
    });
}
