use render_samples::{flow, samples::SampleKind};

fn main() -> anyhow::Result<()> {
    let kind = match std::env::args().nth(1) {
        Some(name) => name.parse::<SampleKind>()?,
        None => SampleKind::default(),
    };
    flow::run(kind)
}
