use glam::{Quat, Vec3};

/// Joint driven by the up/down arrows. Cycles on each action release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Joint {
    #[default]
    UpperLeg,
    LowerLeg,
    Gripper,
}

impl Joint {
    pub fn next(self) -> Self {
        match self {
            Joint::UpperLeg => Joint::LowerLeg,
            Joint::LowerLeg => Joint::Gripper,
            Joint::Gripper => Joint::UpperLeg,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Joint::UpperLeg => "upper leg",
            Joint::LowerLeg => "lower leg",
            Joint::Gripper => "gripper",
        }
    }
}

/// Authored rotation plus how far the player has turned the joint away from it.
#[derive(Debug, Clone, Copy)]
pub struct JointPose {
    base: Quat,
    axis: Vec3,
    /// Degrees, unbounded.
    pub offset: f32,
}

impl JointPose {
    pub fn new(base: Quat, axis: Vec3) -> Self {
        Self { base, axis, offset: 0.0 }
    }

    pub fn base(&self) -> Quat {
        self.base
    }

    pub fn rotation(&self) -> Quat {
        self.base * Quat::from_axis_angle(self.axis, self.offset.to_radians())
    }
}

/// The four posable joints of the arm.
#[derive(Debug, Clone)]
pub struct ArmJoints {
    pub hip: JointPose,
    pub upper_leg: JointPose,
    pub lower_leg: JointPose,
    pub gripper: JointPose,
    pub active: Joint,
}

impl ArmJoints {
    pub const HIP_AXIS: Vec3 = Vec3::Z;
    pub const LIMB_AXIS: Vec3 = Vec3::NEG_X;

    pub fn new(hip: Quat, upper_leg: Quat, lower_leg: Quat, gripper: Quat) -> Self {
        Self {
            hip: JointPose::new(hip, Self::HIP_AXIS),
            upper_leg: JointPose::new(upper_leg, Self::LIMB_AXIS),
            lower_leg: JointPose::new(lower_leg, Self::LIMB_AXIS),
            gripper: JointPose::new(gripper, Self::LIMB_AXIS),
            active: Joint::default(),
        }
    }

    pub fn active_pose_mut(&mut self) -> &mut JointPose {
        match self.active {
            Joint::UpperLeg => &mut self.upper_leg,
            Joint::LowerLeg => &mut self.lower_leg,
            Joint::Gripper => &mut self.gripper,
        }
    }

    pub fn advance_active(&mut self) -> Joint {
        self.active = self.active.next();
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_after_three() {
        let start = Joint::default();
        assert_eq!(start.next().next().next(), start);
        assert_ne!(start.next(), start);
        assert_ne!(start.next().next(), start);
    }

    #[test]
    fn test_zero_offset_keeps_base_pose() {
        let base = Quat::from_rotation_y(0.7);
        let pose = JointPose::new(base, Vec3::NEG_X);
        assert!(pose.rotation().abs_diff_eq(base, 1e-6));
    }

    #[test]
    fn test_offset_composes_after_base() {
        let base = Quat::from_rotation_z(0.5);
        let mut pose = JointPose::new(base, Vec3::NEG_X);
        pose.offset = 90.0;
        let expected = base * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        assert!(pose.rotation().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_active_pose_follows_cursor() {
        let mut joints = ArmJoints::new(Quat::IDENTITY, Quat::IDENTITY, Quat::IDENTITY, Quat::IDENTITY);
        joints.active_pose_mut().offset = 1.0;
        joints.advance_active();
        joints.active_pose_mut().offset = 2.0;
        joints.advance_active();
        joints.active_pose_mut().offset = 3.0;

        assert_eq!(joints.upper_leg.offset, 1.0);
        assert_eq!(joints.lower_leg.offset, 2.0);
        assert_eq!(joints.gripper.offset, 3.0);
        assert_eq!(joints.hip.offset, 0.0);
        assert_eq!(joints.advance_active(), Joint::UpperLeg);
    }
}
