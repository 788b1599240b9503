//! End-to-end output scenarios against a simulated TIM2 and an MCP4922 on a recording bus.
use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc};

use embedded_hal_1::spi::{ErrorType, SpiBus};
use funcgen::{
    encode, Controller, Frequency, Intent, OutputHandler, Parameters, SampleTimer, Shape, Shared,
    TimerEvent,
};
use mcp4922::{Command, Mcp4922};

const HEADER: u16 = Command::HEADER;
const HIGH: u16 = HEADER | 3300;

/// Upcounting timer with preloaded reload value and immediate compare value.
#[derive(Default)]
struct SimTimer {
    counter: u32,
    period: u32,
    preload: u32,
    compare: u32,
    update_flag: bool,
    compare_flag: bool,
}

impl SimTimer {
    /// Run until the next event.
    fn step(&mut self) {
        if self.compare > self.counter && self.compare <= self.period {
            self.counter = self.compare;
            self.compare_flag = true;
        } else {
            self.update();
        }
    }

    fn update(&mut self) {
        self.counter = 0;
        self.period = self.preload;
        self.update_flag = true;
    }
}

impl SampleTimer for SimTimer {
    fn set_period(&mut self, ticks: u32) {
        self.preload = ticks;
    }

    fn set_compare(&mut self, ticks: u32) {
        self.compare = ticks;
    }

    fn latch(&mut self) {
        self.update();
    }

    fn pending(&self) -> Option<TimerEvent> {
        if self.update_flag {
            Some(TimerEvent::PeriodElapsed)
        } else if self.compare_flag {
            Some(TimerEvent::CompareMatch)
        } else {
            None
        }
    }

    fn clear(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::PeriodElapsed => self.update_flag = false,
            TimerEvent::CompareMatch => self.compare_flag = false,
        }
    }
}

#[derive(Clone, Default)]
struct Bus(Rc<RefCell<Vec<u16>>>);

impl ErrorType for Bus {
    type Error = Infallible;
}

impl SpiBus<u16> for Bus {
    fn read(&mut self, words: &mut [u16]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u16]) -> Result<(), Infallible> {
        self.0.borrow_mut().extend_from_slice(words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u16], write: &[u16]) -> Result<(), Infallible> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u16]) -> Result<(), Infallible> {
        self.0.borrow_mut().extend_from_slice(words);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Bench {
    controller: Controller,
    shared: Shared<SimTimer>,
    handler: OutputHandler,
    dac: Mcp4922<Bus>,
    words: Rc<RefCell<Vec<u16>>>,
}

impl Bench {
    fn new(shape: Shape, frequency: u8) -> Self {
        let controller = Controller::new(Parameters {
            shape,
            frequency: Frequency::try_from(frequency).unwrap(),
            ..Default::default()
        });
        let shared = Shared::new(controller.render().unwrap(), SimTimer::default());
        let bus = Bus::default();
        let words = bus.0.clone();
        Self {
            controller,
            shared,
            handler: OutputHandler::default(),
            dac: Mcp4922::new(bus),
            words,
        }
    }

    /// Service the pending event, then run the timer to the next one.
    fn tick(&mut self) -> TimerEvent {
        let event = self.shared.lock(|_, t| t.pending()).unwrap();
        self.shared.service(&mut self.handler, &mut self.dac);
        self.shared.lock(|render, t| {
            assert!(self.handler.cursor().index <= render.table().len());
            t.step();
        });
        event
    }

    /// Service the pending event without advancing the timer.
    fn service(&mut self) {
        self.shared.service(&mut self.handler, &mut self.dac);
    }

    fn change(&mut self, intent: Intent) {
        let next = self.controller.handle(intent).unwrap();
        drop(self.shared.publish(next));
    }

    fn words(&self) -> Vec<u16> {
        self.words.borrow().clone()
    }
}

#[test]
fn square_one_hertz_half_duty() {
    let mut bench = Bench::new(Shape::Square, 1);
    bench.shared.lock(|render, t| {
        assert_eq!(render.timing().period_ticks, 200_100);
        assert_eq!(render.timing().compare_ticks, 100_049);
        assert_eq!(t.period, 200_100);
        assert_eq!(t.compare, 100_049);
    });

    let events: Vec<_> = (0..6).map(|_| bench.tick()).collect();
    assert_eq!(
        events,
        [
            TimerEvent::PeriodElapsed,
            TimerEvent::CompareMatch,
            TimerEvent::PeriodElapsed,
            TimerEvent::CompareMatch,
            TimerEvent::PeriodElapsed,
            TimerEvent::CompareMatch,
        ]
    );
    assert_eq!(bench.words(), [HEADER, HIGH, HEADER, HIGH, HEADER, HIGH]);
    // The duty edge stays put.
    assert_eq!(bench.shared.lock(|_, t| t.compare), 100_049);
}

#[test]
fn sine_five_hertz_restarts_every_period() {
    let mut bench = Bench::new(Shape::Sine, 5);
    let (table, interval) = bench
        .shared
        .lock(|render, _| (render.table().clone(), render.timing().sample_interval(23)));
    assert_eq!(table.len(), 23);

    assert_eq!(bench.tick(), TimerEvent::PeriodElapsed);
    assert_eq!(bench.handler.cursor().index, 0);

    let mut matches = 0;
    let mut periods = 0;
    while matches < 2 * table.len() {
        match bench.tick() {
            TimerEvent::CompareMatch => matches += 1,
            TimerEvent::PeriodElapsed => periods += 1,
        }
    }
    assert_eq!(periods, 1);
    assert_eq!(bench.handler.cursor().index % table.len(), 0);
    assert_eq!(bench.shared.lock(|_, t| t.compare), interval * 24);

    let expected: Vec<u16> = core::iter::once(encode(0))
        .chain(table.iter().map(|&mv| encode(mv as u32)))
        .cycle()
        .take(2 * (table.len() + 1))
        .collect();
    assert_eq!(bench.words(), expected);
}

#[test]
fn sine_to_square_mid_period() {
    let mut bench = Bench::new(Shape::Sine, 1);
    for _ in 0..51 {
        bench.tick();
    }
    assert_eq!(bench.handler.cursor().index, 50);

    bench.change(Intent::Shape(Shape::Square));
    bench.words.borrow_mut().clear();

    for _ in 0..6 {
        bench.tick();
    }
    assert_eq!(bench.words(), [HEADER, HIGH, HEADER, HIGH, HEADER, HIGH]);
    assert_eq!(bench.shared.lock(|render, _| render.epoch()), 1);
}

#[test]
fn due_sample_dropped_on_publish() {
    let mut bench = Bench::new(Shape::Sine, 1);
    for _ in 0..51 {
        bench.tick();
    }
    assert_eq!(
        bench.shared.lock(|_, t| t.pending()),
        Some(TimerEvent::CompareMatch)
    );

    bench.change(Intent::Shape(Shape::Square));
    bench.words.borrow_mut().clear();

    // Nothing but the restart is serviced until the timer reaches the new duty edge.
    bench.service();
    bench.service();
    assert_eq!(bench.words(), [HEADER, HEADER]);
    assert_eq!(bench.shared.lock(|_, t| t.pending()), None);
}

#[test]
fn frequency_change_with_stale_compare() {
    let mut bench = Bench::new(Shape::Triangle, 1);
    for _ in 0..101 {
        bench.tick();
    }
    assert_eq!(bench.handler.cursor().index, 100);

    // A compare match is already due when the shorter table is published.
    assert_eq!(
        bench.shared.lock(|_, t| t.pending()),
        Some(TimerEvent::CompareMatch)
    );
    bench.change(Intent::Frequency(Frequency::try_from(5).unwrap()));

    let table = bench.shared.lock(|render, _| render.table().clone());
    assert_eq!(table.len(), 23);
    for _ in 0..100 {
        bench.tick();
        assert!(bench.handler.cursor().index <= table.len());
    }
    assert_eq!(bench.handler.cursor().epoch, 1);
}

#[test]
fn every_table_shape_plays_in_order() {
    for shape in [Shape::Sine, Shape::Triangle, Shape::Sawtooth] {
        for frequency in 1..=5 {
            let mut bench = Bench::new(shape, frequency);
            let table = bench.shared.lock(|render, _| render.table().clone());
            for _ in 0..=table.len() {
                bench.tick();
            }
            let expected: Vec<u16> = core::iter::once(encode(0))
                .chain(table.iter().map(|&mv| encode(mv as u32)))
                .collect();
            assert_eq!(bench.words(), expected, "{shape:?} {frequency}");
        }
    }
}
