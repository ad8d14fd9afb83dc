use crate::{
    algorithms::{DEFAULT_THRESHOLD_MULTIPLIER, LabellingComponentCounter, OtsuBinarizer, QuadEulerCalculator},
    config::HoleCountConfig,
    counter::HoleCounter,
    error::Result,
    pipeline::Pipeline,
    traits::{ComponentCounter, EulerCalculator},
    types::Polarity,
};

/// Builder for creating hole counting pipelines with a fluent API
pub struct PipelineBuilder {
    threshold_multiplier: f64,
    part_polarity: Polarity,
    component_counter: Option<Box<dyn ComponentCounter>>,
    euler_calculator: Option<Box<dyn EulerCalculator>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            threshold_multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
            part_polarity: Polarity::PartIsLow,
            component_counter: None,
            euler_calculator: None,
        }
    }

    /// Start from the values of a configuration
    pub fn from_config(config: &HoleCountConfig) -> Self {
        Self::new()
            .threshold_multiplier(config.threshold_multiplier)
            .part_polarity(config.part_polarity)
    }

    pub fn threshold_multiplier(mut self, multiplier: f64) -> Self {
        self.threshold_multiplier = multiplier;
        self
    }

    /// Set which side of the threshold the part ends up on
    pub fn part_polarity(mut self, polarity: Polarity) -> Self {
        self.part_polarity = polarity;
        self
    }

    /// Set the component counter (replaces any existing one)
    pub fn set_component_counter<C>(mut self, counter: C) -> Self
    where
        C: ComponentCounter + 'static,
    {
        self.component_counter = Some(Box::new(counter));
        self
    }

    /// Set the Euler calculator (replaces any existing one)
    pub fn set_euler_calculator<E>(mut self, calculator: E) -> Self
    where
        E: EulerCalculator + 'static,
    {
        self.euler_calculator = Some(Box::new(calculator));
        self
    }

    /// Build the pipeline with default components if not specified.
    ///
    /// Fails when the multiplier is unusable or the counter pair disagrees
    /// on connectivity.
    pub fn build(self) -> Result<Pipeline> {
        HoleCountConfig {
            threshold_multiplier: self.threshold_multiplier,
            part_polarity: self.part_polarity,
        }
        .validate()?;

        let binarizer = OtsuBinarizer::new(self.threshold_multiplier, self.part_polarity)?;

        let component_counter = self
            .component_counter
            .unwrap_or_else(|| Box::new(LabellingComponentCounter::default()));
        let euler_calculator = self
            .euler_calculator
            .unwrap_or_else(|| Box::new(QuadEulerCalculator));

        let hole_counter = HoleCounter::new(component_counter, euler_calculator)?;
        Ok(Pipeline::new(binarizer, hole_counter))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
