fn main() {
    divan::main();
}

static EDGE_COUNTS: [usize; 3] = [100, 1_000, 10_000];

#[divan::bench_group(max_time = 5)]
mod parser_benches {
    #[divan::bench(args = super::EDGE_COUNTS)]
    fn bench_parse_graph(bencher: divan::Bencher, edges: usize) {
        bencher
            .with_inputs(|| super::synthetic_graph(edges))
            .bench_refs(|content| rrt_parser::parse_graph(content).unwrap());
    }

    #[divan::bench(args = super::EDGE_COUNTS)]
    fn bench_parse_path(bencher: divan::Bencher, edges: usize) {
        bencher
            .with_inputs(|| super::synthetic_path(edges))
            .bench_refs(|content| rrt_parser::parse_path(content).unwrap());
    }
}

fn synthetic_graph(edges: usize) -> String {
    (0..edges + 2)
        .map(|i| {
            let f = i as f64 * 1e-4;
            format!("{},{}-{},{}\n", 5.0 + f, 5.0 - f, 5.0 + f * 0.5, 5.0 - f * 0.5)
        })
        .collect()
}

fn synthetic_path(edges: usize) -> String {
    (0..=edges)
        .map(|i| {
            let f = i as f64 * 1e-4;
            format!("{},{}-", 9.0 - f, 9.5 - f)
        })
        .collect()
}
