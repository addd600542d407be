use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mython::lexer;

fn workload_source() -> String {
    let block = concat!(
        "class Counter:\n",
        "  def __init__(self):\n",
        "    self.count = 0\n",
        "  def add(self, step):\n",
        "    self.count = self.count + step\n",
        "    return self.count\n",
        "c = Counter()\n",
        "if c.add(2) >= 2:\n",
        "  print 'grew', c.count # expected path\n",
        "print c.add(3), \"done\"\n",
    );
    block.repeat(64)
}

fn bench_lexer(c: &mut Criterion) {
    let source = workload_source();

    c.bench_function("lexer_tokenize_workload", |b| {
        b.iter(|| {
            let tokens = lexer::tokenize(black_box(&source)).expect("tokenize");
            black_box(tokens);
        })
    });

    c.bench_function("lexer_render_token_stream", |b| {
        let tokens = lexer::tokenize(&source).expect("tokenize");
        b.iter(|| {
            let rendered = tokens
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            black_box(rendered);
        })
    });
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
