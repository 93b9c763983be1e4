use criterion::{black_box, criterion_group, criterion_main, Criterion};
use morse_core::hal::mock::{MockIdlePattern, MockOutputLine};
use morse_core::{AccessGate, Sequencer, TimingConfig, Transmitter, MESSAGE_CAPACITY};

fn full_message() -> [u8; MESSAGE_CAPACITY] {
    let alphabet = b"abcdefghijklmnopqrstuvwxyz0123456789 ,.?";
    let mut message = [0u8; MESSAGE_CAPACITY];
    for (i, byte) in message.iter_mut().enumerate() {
        *byte = alphabet[i % alphabet.len()];
    }
    message
}

fn sequencer_steps(c: &mut Criterion) {
    let message = full_message();
    let mut sequencer: Sequencer = Sequencer::new(TimingConfig::default());

    c.bench_function("sequencer_full_buffer", |b| {
        b.iter(|| {
            sequencer.load(black_box(&message)).ok();
            let mut steps = 0usize;
            while !sequencer.step().is_done() {
                steps += 1;
            }
            black_box(steps)
        })
    });
}

fn transmitter_steps(c: &mut Criterion) {
    let message = full_message();
    let gate = AccessGate::new();
    let mut tx: Transmitter<'_, _, _> =
        Transmitter::new(&gate, MockOutputLine::new(), MockIdlePattern::new(), TimingConfig::default());

    c.bench_function("transmitter_full_buffer", |b| {
        b.iter(|| {
            tx.submit(black_box(&message)).ok();
            while !tx.step().is_done() {}
        })
    });
}

fn timing_total(c: &mut Criterion) {
    let message = full_message();
    let timing = TimingConfig::default();

    c.bench_function("total_for_full_buffer", |b| b.iter(|| timing.total_for(black_box(&message))));
}

criterion_group!(benches, sequencer_steps, transmitter_steps, timing_total);
criterion_main!(benches);
