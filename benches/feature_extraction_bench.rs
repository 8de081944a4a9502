use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use url_classifier_backend::services::{
    feature_extractor::shannon_entropy,
    scorer::{LogisticRegression, StandardScaler},
    DomainAllowlist, FeatureExtractor, PredictionService, Scorer,
};
use url_classifier_backend::FEATURE_COUNT;

const URLS: [(&str, &str); 4] = [
    ("short", "example.com"),
    ("typical", "https://www.example.com/path/to/page?a=1&b=2#top"),
    ("phishing", "http://secure-paypal-login.verify-account.xyz/signin?session=8f3a9c2e"),
    (
        "long",
        "https://cdn.assets.static.example.co/v2/images/2024/10/banner_large.png?w=1920&h=1080&q=85&fmt=webp&token=ab12cd34ef56",
    ),
];

fn extractor() -> FeatureExtractor {
    let domains = (0..10_000).map(|i| format!("domain{}.com", i));
    FeatureExtractor::new(Arc::new(DomainAllowlist::with_domains(domains)))
}

fn bench_extract(c: &mut Criterion) {
    let extractor = extractor();
    let mut group = c.benchmark_group("feature_extraction");

    for (name, url) in URLS {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &url, |b, url| {
            b.iter(|| extractor.extract(black_box(url)));
        });
    }
    group.finish();
}

fn bench_entropy(c: &mut Criterion) {
    let (_, url) = URLS[3];

    c.bench_function("shannon_entropy", |b| {
        b.iter(|| shannon_entropy(black_box(url)));
    });
}

fn bench_predict(c: &mut Criterion) {
    let scaler = StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT])
        .expect("Failed to build scaler");
    let model = LogisticRegression::new(vec![0.01; FEATURE_COUNT], -0.5);
    let scorer = Scorer::new(Box::new(scaler), None, Box::new(model), &[0, 1], 1)
        .expect("Failed to build scorer");
    let service = PredictionService::new(extractor(), Arc::new(scorer));

    c.bench_function("predict_typical_url", |b| {
        b.iter(|| service.predict(black_box(URLS[1].1)));
    });
}

criterion_group!(benches, bench_extract, bench_entropy, bench_predict);
criterion_main!(benches);
