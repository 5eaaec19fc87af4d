use super::{Frame, Scene};
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::pipeline::ClearOp;
use crate::util::Assets;

/// Clears the window to a fixed color and draws nothing.
#[derive(Debug, Default)]
pub struct Clear;

/// Dark blue, partly transparent.
const CLEAR_COLOR: [f32; 4] = [0.0, 0.1, 0.2, 0.3];

impl Scene for Clear {
    const NAME: &'static str = "clear";

    fn init<D: Driver>(_factory: &Factory<D>, _assets: &Assets) -> Result<Self> {
        Ok(Clear)
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, _frame: &Frame) {
        factory.clear(ClearOp::color(CLEAR_COLOR));
    }
}
