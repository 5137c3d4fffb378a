use crate::{Angles, Joint, Point};

/// Link geometry of the Z-frame.
///
/// # Parameters
///
/// + Base pivot `base` in screen coordinates
/// + Middle link `middle`
/// + Seat-pan link `seat_pan`
/// + Backrest link `backrest`
/// + Hover distance of the links `hover`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Base pivot
    pub base: [f64; 2],
    /// Length of the middle link
    pub middle: f64,
    /// Length of the seat-pan link
    pub seat_pan: f64,
    /// Length of the backrest link
    pub backrest: f64,
    /// Hit-testing threshold of the links
    pub hover: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

/// Joint positions of a pose.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    /// Base pivot
    pub base: [f64; 2],
    /// End of the middle link
    pub middle_end: [f64; 2],
    /// End of the seat-pan link
    pub seat_end: [f64; 2],
    /// End of the backrest link
    pub backrest_end: [f64; 2],
}

impl Pose {
    /// Pivot of a joint.
    pub fn pivot(&self, joint: Joint) -> [f64; 2] {
        match joint {
            Joint::Middle => self.base,
            Joint::SeatPan => self.middle_end,
            Joint::Backrest => self.seat_end,
        }
    }

    /// Link driven by a joint, as `[start, end]`.
    pub fn link(&self, joint: Joint) -> [[f64; 2]; 2] {
        match joint {
            Joint::Middle => [self.base, self.middle_end],
            Joint::SeatPan => [self.middle_end, self.seat_end],
            Joint::Backrest => [self.seat_end, self.backrest_end],
        }
    }
}

impl Geometry {
    /// Minimum layout height.
    pub const MIN_HEIGHT: f64 = 520.;

    /// The default layout.
    pub const fn new() -> Self {
        Self {
            base: [240., 400.],
            middle: 180.,
            seat_pan: 160.,
            backrest: 150.,
            hover: 12.,
        }
    }

    /// Move the base pivot for a new view size.
    ///
    /// The frame is centered horizontally and placed at two thirds of the
    /// height.
    pub fn layout(&mut self, width: f64, height: f64) {
        let height = height.max(Self::MIN_HEIGHT);
        self.base = [(width / 2.).round(), 2. * (height / 3.).round()];
    }

    /// End of the middle link.
    pub fn middle_end(&self, a: &Angles) -> [f64; 2] {
        self.base.pla(self.middle, a.middle_dir())
    }

    /// End of the seat-pan link.
    pub fn seat_end(&self, a: &Angles) -> [f64; 2] {
        self.middle_end(a).pla(self.seat_pan, a.seat_pan_dir())
    }

    /// End of the backrest link.
    pub fn backrest_end(&self, a: &Angles) -> [f64; 2] {
        self.seat_end(a).pla(self.backrest, a.backrest_dir())
    }

    /// All joint positions.
    pub fn pose(&self, a: &Angles) -> Pose {
        let middle_end = self.base.pla(self.middle, a.middle_dir());
        let seat_end = middle_end.pla(self.seat_pan, a.seat_pan_dir());
        let backrest_end = seat_end.pla(self.backrest, a.backrest_dir());
        Pose { base: self.base, middle_end, seat_end, backrest_end }
    }

    /// Find the link under the cursor.
    ///
    /// The tip of the chain takes priority, since the links overlap at their
    /// shared pivots.
    pub fn hover(&self, a: &Angles, cursor: [f64; 2]) -> Option<Joint> {
        let pose = self.pose(a);
        [Joint::Backrest, Joint::SeatPan, Joint::Middle]
            .into_iter()
            .find(|&joint| {
                let [start, end] = pose.link(joint);
                cursor.seg_dist(&start, &end) < self.hover
            })
    }
}
