use super::*;
use crate::base::mem::{MemRequest, MemRequestSink};
use crate::base::port::ResponsePort;
use crate::timeq::Cycle;

const MAX_CYCLES: Cycle = 1000;

fn run(dram: &mut Dram, from: Cycle, to: Cycle) {
    for now in from..=to {
        dram.tick(now);
    }
}

fn drain(port: &ResponsePort) -> Vec<(Cycle, u64)> {
    std::iter::from_fn(|| port.pop_due(Cycle::MAX))
        .map(|timed| (timed.ready_at, timed.payload.addr))
        .collect()
}

fn addr(dram: &Dram, channel: u64, bank: u64, row: u64) -> u64 {
    dram.address_map().compose(0, channel, 0, bank, row)
}

fn default_dram() -> Dram {
    Dram::new(&DramConfig::default())
}

#[test]
fn first_access_pays_activate() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    dram.submit(MemRequest::read(a, port.clone()));
    run(&mut dram, 0, MAX_CYCLES);
    // (tRCD + tCCD + tCL) * 4
    assert_eq!(drain(&port), vec![(104, a)]);
    assert_eq!(dram.bank(0, 0).open_row, Some(5));
    assert_eq!(dram.stats().row_misses(), 1);
}

#[test]
fn row_hit_then_conflict_inside_tras() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    let b = a | 0x8; // same line, same row
    let c = addr(&dram, 0, 0, 9);
    for target in [a, b, c] {
        dram.submit(MemRequest::read(target, port.clone()));
    }
    run(&mut dram, 0, MAX_CYCLES);
    // b: hit issued at 60, (tCCD + tCL) * 4 later
    // c: conflict issued at 76, before next_conflict = 112, pays tRP + tRCD + tCCD + tCL
    assert_eq!(drain(&port), vec![(104, a), (120, b), (224, c)]);

    let stats = dram.stats();
    assert_eq!(stats.row_misses(), 1);
    assert_eq!(stats.row_hits(), 1);
    assert_eq!(stats.row_conflicts(), 1);
    assert_eq!(stats.early_conflicts(), 1);
    assert_eq!(stats.peak_queue_depth(), 3);

    let bank = dram.bank(0, 0);
    assert_eq!(bank.open_row, Some(9));
    assert_eq!(bank.next_conflict, 76 + (11 + 28) * 4);
    assert_eq!(bank.next_request, 76 + (11 + 11 + 4) * 4);
}

#[test]
fn strict_tras_waits_out_the_window() {
    let mut dram = Dram::new(&DramConfig {
        strict_tras: true,
        ..DramConfig::default()
    });
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    let c = addr(&dram, 0, 0, 9);
    dram.submit(MemRequest::read(a, port.clone()));
    dram.submit(MemRequest::read(c, port.clone()));
    run(&mut dram, 0, MAX_CYCLES);
    // c can only precharge once next_conflict = 112 has passed
    assert_eq!(drain(&port), vec![(104, a), (112 + 37 * 4, c)]);
    assert_eq!(dram.stats().early_conflicts(), 0);
}

#[test]
fn younger_hit_beats_older_conflict() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    dram.submit(MemRequest::read(a, port.clone()));
    run(&mut dram, 0, 59);

    let d = addr(&dram, 0, 0, 9);
    let e = a | 0x10;
    dram.submit(MemRequest::read(d, port.clone()));
    dram.submit(MemRequest::read(e, port.clone()));
    run(&mut dram, 60, MAX_CYCLES);
    assert_eq!(drain(&port), vec![(104, a), (120, e), (224, d)]);
}

#[test]
fn cooled_conflict_is_passed_over_for_a_miss() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    dram.submit(MemRequest::read(a, port.clone()));
    run(&mut dram, 0, 59);

    // bank 0 is free again at 60 but still inside its tRAS window
    let conflict = addr(&dram, 0, 0, 9);
    let miss = addr(&dram, 0, 2, 0);
    dram.submit(MemRequest::read(conflict, port.clone()));
    dram.submit(MemRequest::read(miss, port.clone()));
    dram.tick(60);
    assert_eq!(dram.pending(), 1);
    assert_eq!(dram.bank(0, 2).open_row, Some(0));
    assert_eq!(dram.bank(0, 0).open_row, Some(5));
}

#[test]
fn oldest_miss_is_served_first() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let g = addr(&dram, 0, 2, 0);
    let f = addr(&dram, 0, 1, 0);
    dram.submit(MemRequest::read(g, port.clone()));
    dram.submit(MemRequest::read(f, port.clone()));
    run(&mut dram, 0, MAX_CYCLES);
    // f waits tCCD * 4 = 16 for the channel
    assert_eq!(drain(&port), vec![(104, g), (120, f)]);
}

#[test]
fn busy_bank_does_not_block_other_banks() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    dram.submit(MemRequest::read(a, port.clone()));
    run(&mut dram, 0, 15);
    let hit = a | 0x20;
    let other = addr(&dram, 0, 3, 1);
    dram.submit(MemRequest::read(hit, port.clone()));
    dram.submit(MemRequest::read(other, port.clone()));
    dram.tick(16);
    assert_eq!(dram.bank(0, 3).open_row, Some(1));
    assert_eq!(dram.pending(), 1);
    run(&mut dram, 17, MAX_CYCLES);
    // other issued at 16, hit waits for bank 0 until 60; both land at 120
    let mut responses = drain(&port);
    responses.sort();
    let mut expected = vec![(104, a), (120, other), (120, hit)];
    expected.sort();
    assert_eq!(responses, expected);
}

#[test]
fn channels_schedule_independently() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let ch0 = addr(&dram, 0, 4, 2);
    let ch1 = addr(&dram, 1, 4, 2);
    dram.submit(MemRequest::read(ch0, port.clone()));
    dram.submit(MemRequest::read(ch1, port.clone()));
    run(&mut dram, 0, MAX_CYCLES);
    let mut responses = drain(&port);
    responses.sort();
    let mut expected = vec![(104, ch0), (104, ch1)];
    expected.sort();
    assert_eq!(responses, expected);
}

#[test]
fn only_divided_cycles_issue() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let a = addr(&dram, 0, 0, 5);
    run(&mut dram, 0, 0);
    dram.submit(MemRequest::read(a, port.clone()));
    run(&mut dram, 1, 3);
    assert_eq!(dram.pending(), 1);
    dram.tick(4);
    assert_eq!(dram.pending(), 0);
    assert_eq!(drain(&port), vec![(4 + 104, a)]);
}

#[test]
fn writes_occupy_the_bank_without_responding() {
    let mut dram = default_dram();
    let port = ResponsePort::new();
    let w = addr(&dram, 0, 0, 5);
    let r = w | 0x8;
    dram.submit(MemRequest::write(w));
    dram.submit(MemRequest::read(r, port.clone()));
    run(&mut dram, 0, MAX_CYCLES);
    assert_eq!(drain(&port), vec![(120, r)]);
    assert_eq!(dram.stats().writes(), 1);
    assert_eq!(dram.stats().reads(), 1);
    assert_eq!(dram.stats().row_hits(), 1);
}

#[test]
fn identical_inputs_give_identical_schedules() {
    let schedule = || {
        let mut dram = default_dram();
        let port = ResponsePort::new();
        for i in 0..64u64 {
            let target = (i * 0x1_2345) & 0xff_ffc0;
            if i % 5 == 0 {
                dram.submit(MemRequest::write(target));
            } else {
                dram.submit(MemRequest::read(target, port.clone()));
            }
        }
        run(&mut dram, 0, 20_000);
        (drain(&port), dram.stats())
    };
    let first = schedule();
    assert_eq!(first.0.len(), 64 - 13);
    assert_eq!(first, schedule());
}
