//! Satellite state interpolation
pub mod neville;

use crate::{
    record::VELOCITY, DataBlock, EphemerisReader, Error, EventFlags, InterpolationError,
    SatelliteId, Vector3D,
};

use hifitime::{Duration, Epoch, Unit};
use neville::{neville_interpolation3, Tableau};
use std::io::{BufRead, Seek};

#[cfg(feature = "log")]
use log::{debug, error, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interpolation window settings
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterpolationOptions {
    /// Samples up to this duration away from the requested instant
    /// (on either side) take part in the interpolation
    pub max_duration: Duration,
    /// Minimal number of samples on each side of the requested instant.
    /// The left side includes the sample at or right before that instant.
    pub min_points_per_side: usize,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            max_duration: 3.0 * Unit::Minute,
            min_points_per_side: 2,
        }
    }
}

impl InterpolationOptions {
    /// Copies and returns [InterpolationOptions] with updated window duration
    pub fn with_max_duration(&self, max_duration: Duration) -> Self {
        let mut s = *self;
        s.max_duration = max_duration;
        s
    }
    /// Copies and returns [InterpolationOptions] with updated minimal
    /// number of samples per side
    pub fn with_min_points_per_side(&self, min_points_per_side: usize) -> Self {
        let mut s = *self;
        s.min_points_per_side = min_points_per_side;
        s
    }
}

/// Interpolated satellite state
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interpolation {
    /// Position (km)
    pub position_km: Vector3D,
    /// Position error estimate (km)
    pub position_error_km: Vector3D,
    /// Velocity (dm/s), when requested
    pub velocity_dm_s: Option<Vector3D>,
    /// Velocity error estimate (dm/s), when requested
    pub velocity_error_dm_s: Option<Vector3D>,
}

/// Buffers reused by every interpolation
#[derive(Debug, Clone)]
struct Workspace {
    t: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    tableau: Tableau,
}

impl Workspace {
    fn new(size: usize) -> Self {
        Self {
            t: Vec::with_capacity(size),
            x: Vec::with_capacity(size),
            y: Vec::with_capacity(size),
            z: Vec::with_capacity(size),
            tableau: Tableau::with_capacity(size),
        }
    }
    fn clear(&mut self) {
        self.t.clear();
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }
}

/// [SatelliteInterpolator] holds the time series of one satellite
/// and interpolates its state at any instant, using the samples
/// surrounding that instant. It is designed for dense re-sampling:
/// successive requests at increasing instants are the fast path.
#[derive(Debug, Clone)]
pub struct SatelliteInterpolator {
    satellite: SatelliteId,
    /// Time origin of the interpolation abscissas
    start_epoch: Epoch,
    options: InterpolationOptions,
    data: Vec<DataBlock>,
    /// Index returned by the previous search
    last_index: usize,
    workspace: Workspace,
}

impl SatelliteInterpolator {
    /// Collects all data of `satellite` with default [InterpolationOptions].
    pub fn new<R: BufRead + Seek>(
        satellite: SatelliteId,
        reader: &mut EphemerisReader<R>,
    ) -> Result<Self, Error> {
        Self::with_options(satellite, reader, InterpolationOptions::default())
    }

    /// Collects all data of `satellite`, from the first epoch onwards.
    /// Epochs where both position and clock are absent are dropped.
    pub fn with_options<R: BufRead + Seek>(
        satellite: SatelliteId,
        reader: &mut EphemerisReader<R>,
        options: InterpolationOptions,
    ) -> Result<Self, Error> {
        if !reader.has_satellite(&satellite) {
            return Err(Error::UnknownSatellite(satellite));
        }

        reader.rewind()?;

        let mut data = Vec::with_capacity(reader.num_epochs() as usize);
        while let Some(block) = reader.next_data_block(&satellite)? {
            if !block
                .flags
                .is_set(EventFlags::ABSENT_POSITION | EventFlags::ABSENT_CLOCK)
            {
                data.push(block);
            }
        }

        if data.is_empty() {
            return Err(Error::EmptyTimeSeries(satellite));
        }

        if data.windows(2).any(|w| w[0].epoch > w[1].epoch) {
            #[cfg(feature = "log")]
            warn!("{}: epochs are not in chronological order", satellite);
            data.sort_by_key(|block| block.epoch);
        }

        let interval = reader.interval().to_seconds();
        let one_side = (options.max_duration.to_seconds() / interval).ceil().max(0.0) as usize;
        // a window never exceeds the time series
        let workspace_size = one_side
            .saturating_mul(2)
            .saturating_add(1)
            .min(data.len());

        #[cfg(feature = "log")]
        debug!(
            "{}: {} samples from {} to {}",
            satellite,
            data.len(),
            data[0].epoch,
            data[data.len() - 1].epoch
        );

        Ok(Self {
            satellite,
            start_epoch: reader.start_epoch(),
            options,
            data,
            last_index: 0,
            workspace: Workspace::new(workspace_size),
        })
    }

    /// Satellite this time series describes
    pub fn satellite(&self) -> SatelliteId {
        self.satellite
    }

    /// Window settings in use
    pub fn options(&self) -> &InterpolationOptions {
        &self.options
    }

    /// Number of samples in the time series
    pub fn num_data_points(&self) -> usize {
        self.data.len()
    }

    /// Samples, in chronological order
    pub fn data_blocks(&self) -> &[DataBlock] {
        &self.data
    }

    /// Epoch of the first sample
    pub fn first_epoch(&self) -> Epoch {
        self.data[0].epoch
    }

    /// Epoch of the last sample
    pub fn last_epoch(&self) -> Epoch {
        self.data[self.data.len() - 1].epoch
    }

    /// True if `data[index]` is the last sample at or before `t`.
    fn brackets(&self, index: usize, t: Epoch) -> bool {
        match self.data.get(index) {
            Some(block) if block.epoch <= t => match self.data.get(index + 1) {
                Some(next) => t < next.epoch,
                None => true,
            },
            _ => false,
        }
    }

    /// Returns the index of the last sample at or before `t`,
    /// trying the previous result and its neighbors first.
    fn index_hunt(&mut self, t: Epoch) -> Option<usize> {
        let last = self.last_index;
        let candidates = [Some(last), last.checked_add(1), last.checked_sub(1)];
        let index = match candidates
            .into_iter()
            .flatten()
            .find(|i| self.brackets(*i, t))
        {
            Some(index) => index,
            None => {
                let count = self.data.partition_point(|block| block.epoch <= t);
                count.checked_sub(1)?
            },
        };
        self.last_index = index;
        Some(index)
    }

    /// Interpolates the state at `t`, velocity included if `velocity` is set.
    /// Errors are recoverable: the interpolator remains usable.
    pub fn interpolate_at(
        &mut self,
        t: Epoch,
        velocity: bool,
    ) -> Result<Interpolation, InterpolationError> {
        let required = self.options.min_points_per_side;
        let index = self
            .index_hunt(t)
            .ok_or(InterpolationError::TooFewPointsBefore { found: 0, required })?;

        let max_duration = self.options.max_duration;

        let after = self.data[index + 1..]
            .iter()
            .take_while(|block| block.epoch - t <= max_duration)
            .count();
        if after < required {
            return Err(InterpolationError::TooFewPointsAfter {
                found: after,
                required,
            });
        }

        let before = self.data[..=index]
            .iter()
            .rev()
            .take_while(|block| t - block.epoch <= max_duration)
            .count();
        if before < required {
            return Err(InterpolationError::TooFewPointsBefore {
                found: before,
                required,
            });
        }

        let window = &self.data[index + 1 - before..=index + after];

        if window
            .iter()
            .any(|block| block.flags.is_set(EventFlags::ABSENT_POSITION))
        {
            return Err(InterpolationError::MissingPosition);
        }
        if velocity
            && window
                .iter()
                .any(|block| block.flags.is_set(EventFlags::ABSENT_VELOCITY))
        {
            return Err(InterpolationError::MissingVelocity);
        }

        let x = (t - self.start_epoch).to_seconds();
        let size = window.len();
        let ws = &mut self.workspace;

        ws.clear();
        for block in window {
            ws.t.push((block.epoch - self.start_epoch).to_seconds());
            ws.x.push(block.state[0]);
            ws.y.push(block.state[1]);
            ws.z.push(block.state[2]);
        }

        let (position, position_error) = neville_interpolation3(
            x,
            &ws.t,
            [&ws.x, &ws.y, &ws.z],
            0,
            size,
            &mut ws.tableau,
        )
        .map_err(|e| {
            #[cfg(feature = "log")]
            error!("{}({}): {}", self.satellite, t, e);
            e
        })?;

        let mut interpolation = Interpolation {
            position_km: (position[0], position[1], position[2]),
            position_error_km: (position_error[0], position_error[1], position_error[2]),
            velocity_dm_s: None,
            velocity_error_dm_s: None,
        };

        if velocity {
            ws.x.clear();
            ws.y.clear();
            ws.z.clear();
            for block in window {
                ws.x.push(block.state[VELOCITY]);
                ws.y.push(block.state[VELOCITY + 1]);
                ws.z.push(block.state[VELOCITY + 2]);
            }
            let (vel, vel_error) = neville_interpolation3(
                x,
                &ws.t,
                [&ws.x, &ws.y, &ws.z],
                0,
                size,
                &mut ws.tableau,
            )?;
            interpolation.velocity_dm_s = Some((vel[0], vel[1], vel[2]));
            interpolation.velocity_error_dm_s = Some((vel_error[0], vel_error[1], vel_error[2]));
        }

        Ok(interpolation)
    }
}
