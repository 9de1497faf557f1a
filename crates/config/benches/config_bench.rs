use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nebula_config::Config;
use serde_json::json;
use tokio::runtime::Runtime;

fn bench_get_scalar(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cfg = rt.block_on(async {
        Config::builder()
            .with_value(json!({
                "server": {"host": "localhost", "port": 8080},
                "tags": ["a", "b", "c"]
            }))
            .build()
            .await
            .unwrap()
    });

    c.bench_function("config_get_scalar", |b| {
        b.to_async(&rt).iter(|| async {
            let port: u16 = cfg.get(black_box("server.port")).await.unwrap();
            black_box(port)
        });
    });
}

fn bench_flatten(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cfg = rt.block_on(async {
        Config::builder()
            .with_value(json!({
                "server": {"host": "localhost", "port": 8080, "tls": {"enabled": true}},
                "tags": ["a", "b", "c"],
                "limits": {"max_conn": 100, "timeout_ms": 5000}
            }))
            .build()
            .await
            .unwrap()
    });

    c.bench_function("config_flatten", |b| {
        b.to_async(&rt).iter(|| async { black_box(cfg.flatten().await) });
    });
}

criterion_group!(benches, bench_get_scalar, bench_flatten);
criterion_main!(benches);
