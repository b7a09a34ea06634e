// SPDX-License-Identifier: MIT OR Apache-2.0
//! Translation and rotation track.
//!
//! Every key carries a translation, an Euler rotation (degrees) and an
//! optional lookup group name at one shared time and interpolation mode.
//! Because all three live in the same [`MoveKey`], the position, rotation and
//! lookup curves can never disagree on key count or key order.
//!
//! On the curve editor the track exposes up to six sub-curves: translation
//! X, Y, Z when translation is shown, followed by rotation X, Y, Z when
//! rotation is shown and quaternion interpolation is off.

use crate::curve_ed::{CurveEdInterface, KeyColor, BLUE, GREEN, RED};
use crate::error::{precondition, TrackError};
use crate::settings::TrackSettings;
use crate::track::KeyframeTrack;
use interp_curve::keys::{self, KeyTrack, KeyTrackMut};
use interp_curve::tangent::KINDA_SMALL_NUMBER;
use interp_curve::{CurvePoint, CurveValue, InterpCurve, InterpCurveMode, InterpMethod, Vec3};
use serde::{Deserialize, Serialize};

/// Frame the key values are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveFrame {
    /// Absolute world values
    #[default]
    World,
    /// Offsets from the initial transform; the first key stays at the origin
    RelativeToInitial,
}

/// One of the two vector channels of a move key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveChannel {
    /// Position
    Translation,
    /// Euler rotation in degrees
    Rotation,
}

impl MoveChannel {
    /// Key colors for the X, Y and Z sub-curves of this channel
    pub fn key_colors(self) -> [KeyColor; 3] {
        match self {
            Self::Translation => [RED, GREEN, BLUE],
            Self::Rotation => [[255, 128, 128], [128, 255, 128], [128, 128, 255]],
        }
    }
}

/// Vector component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// First component
    X,
    /// Second component
    Y,
    /// Third component
    Z,
}

impl Axis {
    /// All axes in component order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A visible scalar sub-curve of a move track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveSubCurve {
    /// Owning channel
    pub channel: MoveChannel,
    /// Component within the channel
    pub axis: Axis,
}

/// Value and tangents of one channel at a key
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelKey {
    /// Output value
    pub value: Vec3,
    /// Tangent arriving at the key
    pub arrive_tangent: Vec3,
    /// Tangent leaving the key
    pub leave_tangent: Vec3,
}

impl ChannelKey {
    fn new(value: Vec3) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

/// A key of a move track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveKey {
    /// Key time
    pub time: f32,
    /// Interpolation mode shared by both channels
    pub interp_mode: InterpCurveMode,
    /// Position channel
    pub translation: ChannelKey,
    /// Rotation channel
    pub rotation: ChannelKey,
    /// Group whose transform this key looks up instead of its own values
    pub lookup_group: Option<String>,
}

impl MoveKey {
    /// Create a linear key with zero tangents and no lookup group
    pub fn new(time: f32, translation: Vec3, rotation: Vec3) -> Self {
        Self {
            time,
            interp_mode: InterpCurveMode::Linear,
            translation: ChannelKey::new(translation),
            rotation: ChannelKey::new(rotation),
            lookup_group: None,
        }
    }

    /// Set interpolation mode
    pub fn with_interp_mode(mut self, mode: InterpCurveMode) -> Self {
        self.interp_mode = mode;
        self
    }

    /// Get one channel
    pub fn channel(&self, channel: MoveChannel) -> &ChannelKey {
        match channel {
            MoveChannel::Translation => &self.translation,
            MoveChannel::Rotation => &self.rotation,
        }
    }

    /// Get one channel mutably
    pub fn channel_mut(&mut self, channel: MoveChannel) -> &mut ChannelKey {
        match channel {
            MoveChannel::Translation => &mut self.translation,
            MoveChannel::Rotation => &mut self.rotation,
        }
    }
}

/// Lookup curve entry as exported by [`MoveTrack::to_curves`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupPoint {
    /// Key time
    pub time: f32,
    /// Group name, if any
    pub group_name: Option<String>,
}

/// One channel of the key list seen as a curve
struct ChannelView<K> {
    keys: K,
    channel: MoveChannel,
    method: InterpMethod,
}

impl<K: AsRef<[MoveKey]>> ChannelView<K> {
    fn key(&self, index: usize) -> &ChannelKey {
        self.keys.as_ref()[index].channel(self.channel)
    }
}

impl<K: AsRef<[MoveKey]>> KeyTrack<Vec3> for ChannelView<K> {
    fn key_count(&self) -> usize {
        self.keys.as_ref().len()
    }

    fn key_in(&self, index: usize) -> f32 {
        self.keys.as_ref()[index].time
    }

    fn key_mode(&self, index: usize) -> InterpCurveMode {
        self.keys.as_ref()[index].interp_mode
    }

    fn key_out(&self, index: usize) -> Vec3 {
        self.key(index).value
    }

    fn key_arrive_tangent(&self, index: usize) -> Vec3 {
        self.key(index).arrive_tangent
    }

    fn key_leave_tangent(&self, index: usize) -> Vec3 {
        self.key(index).leave_tangent
    }

    fn interp_method(&self) -> InterpMethod {
        self.method
    }
}

impl<K: AsRef<[MoveKey]> + AsMut<[MoveKey]>> KeyTrackMut<Vec3> for ChannelView<K> {
    fn set_key_tangents(&mut self, index: usize, arrive: Vec3, leave: Vec3) {
        let key = self.keys.as_mut()[index].channel_mut(self.channel);
        key.arrive_tangent = arrive;
        key.leave_tangent = leave;
    }

    fn set_key_mode(&mut self, index: usize, mode: InterpCurveMode) {
        self.keys.as_mut()[index].interp_mode = mode;
    }
}

/// Track animating translation and rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTrack {
    keys: Vec<MoveKey>,
    /// Auto-tangent tension of the translation channel
    pub lin_curve_tension: f32,
    /// Auto-tangent tension of the rotation channel
    pub ang_curve_tension: f32,
    /// Expose translation on the curve editor
    pub show_translation_on_curve_ed: bool,
    /// Expose rotation on the curve editor (ignored with quaternion interpolation)
    pub show_rotation_on_curve_ed: bool,
    /// Rotation is interpolated as quaternions, so its Euler curves are hidden
    pub use_quat_interpolation: bool,
    /// Frame the key values are expressed in
    pub move_frame: MoveFrame,
    /// Ignore value updates
    pub disable_movement: bool,
    translation_method: InterpMethod,
    rotation_method: InterpMethod,
}

impl MoveTrack {
    /// Create an empty track with default settings
    pub fn new() -> Self {
        Self::from_settings(&TrackSettings::default())
    }

    /// Create an empty track from settings
    pub fn from_settings(settings: &TrackSettings) -> Self {
        Self {
            keys: Vec::new(),
            lin_curve_tension: settings.lin_curve_tension,
            ang_curve_tension: settings.ang_curve_tension,
            show_translation_on_curve_ed: settings.show_translation_on_curve_ed,
            show_rotation_on_curve_ed: settings.show_rotation_on_curve_ed,
            use_quat_interpolation: settings.use_quat_interpolation,
            move_frame: settings.move_frame,
            disable_movement: false,
            translation_method: InterpMethod::default(),
            rotation_method: InterpMethod::default(),
        }
    }

    /// Build a track from separately stored position, rotation and lookup
    /// curves.
    ///
    /// The curves must have the same key count, and each key must have the
    /// same time in all three and the same mode in both vector curves. Times
    /// are compared within [`KINDA_SMALL_NUMBER`]; the translation time is the
    /// one kept. Key times must not decrease.
    pub fn from_curves(
        translation: &InterpCurve<Vec3>,
        rotation: &InterpCurve<Vec3>,
        lookup: &[LookupPoint],
        settings: &TrackSettings,
    ) -> Result<Self, TrackError> {
        if rotation.len() != translation.len() || lookup.len() != translation.len() {
            return Err(TrackError::MisalignedCurves(format!(
                "key counts differ (translation {}, rotation {}, lookup {})",
                translation.len(),
                rotation.len(),
                lookup.len()
            )));
        }

        let mut track = Self::from_settings(settings);
        track.translation_method = translation.interp_method();
        track.rotation_method = rotation.interp_method();

        let points = translation.points().iter().zip(rotation.points()).zip(lookup);
        for (index, ((pos, rot), label)) in points.enumerate() {
            if let Some(prev) = track.keys.last() {
                if pos.in_val < prev.time {
                    return Err(TrackError::MisalignedCurves(format!(
                        "key {index} at {} comes before key {} at {}",
                        pos.in_val,
                        index - 1,
                        prev.time
                    )));
                }
            }
            if (pos.in_val - rot.in_val).abs() > KINDA_SMALL_NUMBER
                || (pos.in_val - label.time).abs() > KINDA_SMALL_NUMBER
            {
                return Err(TrackError::MisalignedCurves(format!(
                    "key {index} times differ (translation {}, rotation {}, lookup {})",
                    pos.in_val, rot.in_val, label.time
                )));
            }
            if pos.interp_mode != rot.interp_mode {
                return Err(TrackError::MisalignedCurves(format!(
                    "key {index} modes differ (translation {}, rotation {})",
                    pos.interp_mode.name(),
                    rot.interp_mode.name()
                )));
            }

            track.keys.push(MoveKey {
                time: pos.in_val,
                interp_mode: pos.interp_mode,
                translation: ChannelKey {
                    value: pos.out_val,
                    arrive_tangent: pos.arrive_tangent,
                    leave_tangent: pos.leave_tangent,
                },
                rotation: ChannelKey {
                    value: rot.out_val,
                    arrive_tangent: rot.arrive_tangent,
                    leave_tangent: rot.leave_tangent,
                },
                lookup_group: label.group_name.clone(),
            });
        }

        Ok(track)
    }

    /// Export the position, rotation and lookup curves
    pub fn to_curves(&self) -> (InterpCurve<Vec3>, InterpCurve<Vec3>, Vec<LookupPoint>) {
        let lookup = self
            .keys
            .iter()
            .map(|key| LookupPoint {
                time: key.time,
                group_name: key.lookup_group.clone(),
            })
            .collect();
        (
            self.channel_curve(MoveChannel::Translation),
            self.channel_curve(MoveChannel::Rotation),
            lookup,
        )
    }

    /// Get all keys
    pub fn keys(&self) -> &[MoveKey] {
        &self.keys
    }

    /// Get a key
    pub fn key(&self, index: usize) -> Option<&MoveKey> {
        self.keys.get(index)
    }

    /// Interp method of one channel
    pub fn interp_method(&self, channel: MoveChannel) -> InterpMethod {
        match channel {
            MoveChannel::Translation => self.translation_method,
            MoveChannel::Rotation => self.rotation_method,
        }
    }

    /// Set the interp method of one channel without touching the keys
    pub fn set_interp_method(&mut self, channel: MoveChannel, method: InterpMethod) {
        match channel {
            MoveChannel::Translation => self.translation_method = method,
            MoveChannel::Rotation => self.rotation_method = method,
        }
    }

    /// Evaluate the translation, zero when empty
    pub fn eval_translation(&self, time: f32) -> Vec3 {
        keys::eval::<Vec3, _>(&self.channel_view(MoveChannel::Translation), time, [0.0; 3])
    }

    /// Evaluate the Euler rotation, zero when empty
    pub fn eval_rotation(&self, time: f32) -> Vec3 {
        keys::eval::<Vec3, _>(&self.channel_view(MoveChannel::Rotation), time, [0.0; 3])
    }

    /// Whether rotation sub-curves are exposed
    pub fn shows_rotation(&self) -> bool {
        self.show_rotation_on_curve_ed && !self.use_quat_interpolation
    }

    /// Sub-curve index of a channel component, `None` when it is hidden
    pub fn calc_sub_index(&self, channel: MoveChannel, axis: Axis) -> Option<usize> {
        match channel {
            MoveChannel::Translation => self.show_translation_on_curve_ed.then(|| axis.index()),
            MoveChannel::Rotation => {
                let offset = if self.show_translation_on_curve_ed { 3 } else { 0 };
                self.shows_rotation().then(|| offset + axis.index())
            }
        }
    }

    /// Channel component behind a sub-curve index, `None` when out of range
    pub fn sub_curve(&self, sub_index: usize) -> Option<MoveSubCurve> {
        self.visible_channels()
            .nth(sub_index / 3)
            .map(|channel| MoveSubCurve {
                channel,
                axis: Axis::ALL[sub_index % 3],
            })
    }

    /// Like [`sub_curve`](Self::sub_curve), with the failure as an error
    pub fn resolve_sub_curve(&self, sub_index: usize) -> Result<MoveSubCurve, TrackError> {
        self.sub_curve(sub_index)
            .ok_or(TrackError::SubCurveOutOfRange {
                index: sub_index,
                count: self.num_sub_curves(),
            })
    }

    /// Insert a key with explicit values; returns its index.
    ///
    /// In a relative-to-initial track the first key keeps zero values, and a
    /// track with movement disabled keeps zero values for every new key.
    pub fn add_keyframe(
        &mut self,
        time: f32,
        translation: Vec3,
        rotation: Vec3,
        mode: InterpCurveMode,
    ) -> usize {
        let index = self.insertion_index(time);
        let key = MoveKey::new(time, [0.0; 3], [0.0; 3]).with_interp_mode(mode);
        self.keys.insert(index, key);
        self.write_values(index, translation, rotation);
        self.recompute_tangents();
        tracing::debug!("Added move keyframe {index} at {time}");
        index
    }

    /// Overwrite the values of a key.
    ///
    /// The rotation is unwound so that no Euler component is more than 180
    /// degrees away from the neighbouring key. Ignored for the first key of a
    /// relative-to-initial track and while movement is disabled.
    pub fn update_keyframe(
        &mut self,
        index: usize,
        translation: Vec3,
        rotation: Vec3,
    ) -> Result<(), TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        if self.write_values(index, translation, rotation) {
            self.recompute_tangents();
        }
        Ok(())
    }

    /// Lookup group name of a key
    pub fn lookup_group_name(&self, index: usize) -> Result<Option<&str>, TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        Ok(self.keys[index].lookup_group.as_deref())
    }

    /// Set the lookup group name of a key; an empty name clears it
    pub fn set_lookup_group_name(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        let name = name.into();
        self.keys[index].lookup_group = (!name.is_empty()).then_some(name);
        Ok(())
    }

    /// Clear the lookup group name of a key
    pub fn clear_lookup_group_name(&mut self, index: usize) -> Result<(), TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        self.keys[index].lookup_group = None;
        Ok(())
    }

    fn visible_channels(&self) -> impl Iterator<Item = MoveChannel> {
        [
            (MoveChannel::Translation, self.show_translation_on_curve_ed),
            (MoveChannel::Rotation, self.shows_rotation()),
        ]
        .into_iter()
        .filter_map(|(channel, shown)| shown.then_some(channel))
    }

    fn channel_view(&self, channel: MoveChannel) -> ChannelView<&[MoveKey]> {
        ChannelView {
            keys: self.keys.as_slice(),
            channel,
            method: self.interp_method(channel),
        }
    }

    fn channel_view_mut(&mut self, channel: MoveChannel) -> ChannelView<&mut [MoveKey]> {
        let method = self.interp_method(channel);
        ChannelView {
            keys: self.keys.as_mut_slice(),
            channel,
            method,
        }
    }

    fn channel_curve(&self, channel: MoveChannel) -> InterpCurve<Vec3> {
        let mut curve = InterpCurve::from_points(self.keys.iter().map(|key| {
            let channel_key = key.channel(channel);
            CurvePoint::new(key.time, channel_key.value)
                .with_interp_mode(key.interp_mode)
                .with_tangents(channel_key.arrive_tangent, channel_key.leave_tangent)
        }));
        curve.set_interp_method(self.interp_method(channel));
        curve
    }

    fn insertion_index(&self, time: f32) -> usize {
        keys::insertion_index::<Vec3, _>(&self.channel_view(MoveChannel::Translation), time)
    }

    fn recompute_tangents(&mut self) {
        let (lin_tension, ang_tension) = (self.lin_curve_tension, self.ang_curve_tension);
        let mut translation = self.channel_view_mut(MoveChannel::Translation);
        keys::auto_set_tangents::<Vec3, _>(&mut translation, lin_tension);
        let mut rotation = self.channel_view_mut(MoveChannel::Rotation);
        keys::auto_set_tangents::<Vec3, _>(&mut rotation, ang_tension);
    }

    /// Write key values unless the key is pinned or movement is disabled.
    /// Returns whether anything was written.
    fn write_values(&mut self, index: usize, translation: Vec3, mut rotation: Vec3) -> bool {
        if self.disable_movement {
            tracing::trace!("Movement disabled, key {index} left unchanged");
            return false;
        }
        if self.move_frame == MoveFrame::RelativeToInitial && index == 0 {
            tracing::trace!("First key of a relative track stays at the origin");
            return false;
        }

        let neighbour = if index > 0 {
            Some(index - 1)
        } else if self.keys.len() > 1 {
            Some(1)
        } else {
            None
        };
        if let Some(neighbour) = neighbour {
            unwind_euler(&mut rotation, self.keys[neighbour].rotation.value);
        }

        let key = &mut self.keys[index];
        key.translation.value = translation;
        key.rotation.value = rotation;
        true
    }

    /// Move a key to a new time, keeping the list sorted; returns the new index
    fn move_key(&mut self, index: usize, new_time: f32) -> usize {
        let mut key = self.keys.remove(index);
        key.time = new_time;
        let new_index = self.insertion_index(new_time);
        self.keys.insert(new_index, key);
        new_index
    }

    fn check_key(&self, key_index: usize) {
        precondition(TrackError::check_key(key_index, self.keys.len()));
    }
}

impl Default for MoveTrack {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift each Euler angle by one turn when it is more than 180 degrees away
/// from the reference angle
fn unwind_euler(rotation: &mut Vec3, reference: Vec3) {
    for (angle, reference) in rotation.iter_mut().zip(reference) {
        let diff = *angle - reference;
        if diff > 180.0 {
            *angle -= 360.0;
        } else if diff < -180.0 {
            *angle += 360.0;
        }
    }
}

impl CurveEdInterface for MoveTrack {
    fn num_keys(&self) -> usize {
        self.keys.len()
    }

    fn num_sub_curves(&self) -> usize {
        self.visible_channels().count() * 3
    }

    fn key_in(&self, key_index: usize) -> f32 {
        self.check_key(key_index);
        self.keys[key_index].time
    }

    fn key_out(&self, sub_index: usize, key_index: usize) -> f32 {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        self.check_key(key_index);
        self.keys[key_index].channel(sub.channel).value[sub.axis.index()]
    }

    fn in_range(&self) -> (f32, f32) {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => (0.0, 0.0),
        }
    }

    fn out_range(&self) -> (f32, f32) {
        self.visible_channels()
            .map(|channel| {
                let view = self.channel_view(channel);
                let (min, max) = keys::calc_bounds::<Vec3, _>(&view, [0.0; 3]);
                (min.min_channel(), max.max_channel())
            })
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
            .unwrap_or((0.0, 0.0))
    }

    fn key_color(&self, sub_index: usize, key_index: usize, _curve_color: KeyColor) -> KeyColor {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        self.check_key(key_index);
        sub.channel.key_colors()[sub.axis.index()]
    }

    fn key_interp_mode(&self, key_index: usize) -> InterpCurveMode {
        self.check_key(key_index);
        self.keys[key_index].interp_mode
    }

    fn tangents(&self, sub_index: usize, key_index: usize) -> (f32, f32) {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        self.check_key(key_index);
        let key = self.keys[key_index].channel(sub.channel);
        let axis = sub.axis.index();
        (key.arrive_tangent[axis], key.leave_tangent[axis])
    }

    fn eval_sub(&self, sub_index: usize, in_val: f32) -> f32 {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        let value = match sub.channel {
            MoveChannel::Translation => self.eval_translation(in_val),
            MoveChannel::Rotation => self.eval_rotation(in_val),
        };
        value[sub.axis.index()]
    }

    fn create_new_key(&mut self, key_in: f32) -> usize {
        let translation = self.eval_translation(key_in);
        let rotation = self.eval_rotation(key_in);
        let index = self.insertion_index(key_in);
        self.keys.insert(index, MoveKey::new(key_in, translation, rotation));
        self.recompute_tangents();
        tracing::trace!("Created move key {index} at {key_in}");
        index
    }

    fn delete_key(&mut self, key_index: usize) {
        self.check_key(key_index);
        self.keys.remove(key_index);
        self.recompute_tangents();
    }

    fn set_key_in(&mut self, key_index: usize, new_in_val: f32) -> usize {
        self.check_key(key_index);
        let new_index = self.move_key(key_index, new_in_val);
        self.recompute_tangents();
        new_index
    }

    fn set_key_out(&mut self, sub_index: usize, key_index: usize, new_out_val: f32) {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        self.check_key(key_index);
        self.keys[key_index].channel_mut(sub.channel).value[sub.axis.index()] = new_out_val;
        // Both channels, even though only one changed
        self.recompute_tangents();
    }

    fn set_key_interp_mode(&mut self, key_index: usize, new_mode: InterpCurveMode) {
        self.check_key(key_index);
        self.keys[key_index].interp_mode = new_mode;
        self.recompute_tangents();
    }

    fn set_tangents(&mut self, sub_index: usize, key_index: usize, arrive: f32, leave: f32) {
        let sub = precondition(self.resolve_sub_curve(sub_index));
        self.check_key(key_index);
        let key = self.keys[key_index].channel_mut(sub.channel);
        let axis = sub.axis.index();
        key.arrive_tangent[axis] = arrive;
        key.leave_tangent[axis] = leave;
    }

    fn using_legacy_interp_method(&self) -> bool {
        self.translation_method.is_legacy() || self.rotation_method.is_legacy()
    }

    fn upgrade_interp_method(&mut self) {
        if !self.using_legacy_interp_method() {
            return;
        }
        // The mode is shared, so baking through one channel freezes both
        let mut translation = self.channel_view_mut(MoveChannel::Translation);
        let baked = keys::bake_auto_tangents::<Vec3, _>(&mut translation);
        self.translation_method = InterpMethod::default();
        self.rotation_method = InterpMethod::default();
        tracing::debug!("Upgraded move track interp method, baked {baked} auto keys");
    }
}

impl KeyframeTrack for MoveTrack {
    fn num_keyframes(&self) -> usize {
        self.keys.len()
    }

    fn keyframe_time(&self, index: usize) -> Option<f32> {
        self.keys.get(index).map(|key| key.time)
    }

    fn set_keyframe_time(&mut self, index: usize, new_time: f32, update_order: bool) -> usize {
        if index >= self.keys.len() {
            return index;
        }
        let new_index = if update_order {
            self.move_key(index, new_time)
        } else {
            self.keys[index].time = new_time;
            index
        };
        self.recompute_tangents();
        new_index
    }

    fn remove_keyframe(&mut self, index: usize) -> Result<(), TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        if self.move_frame == MoveFrame::RelativeToInitial && index == 0 {
            tracing::warn!("Refusing to remove the first key of a relative move track");
            return Err(TrackError::PinnedFirstKey);
        }
        self.keys.remove(index);
        self.recompute_tangents();
        Ok(())
    }

    fn duplicate_keyframe(&mut self, index: usize, new_time: f32) -> Result<usize, TrackError> {
        TrackError::check_key(index, self.keys.len())?;
        let mut key = self.keys[index].clone();
        key.time = new_time;
        let new_index = self.insertion_index(new_time);
        self.keys.insert(new_index, key);
        self.recompute_tangents();
        Ok(new_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_track() -> MoveTrack {
        let mut track = MoveTrack::new();
        track.move_frame = MoveFrame::World;
        track
    }

    fn assert_aligned(track: &MoveTrack) {
        let (translation, rotation, lookup) = track.to_curves();
        assert_eq!(translation.len(), track.num_keys());
        assert_eq!(rotation.len(), track.num_keys());
        assert_eq!(lookup.len(), track.num_keys());
        for index in 0..track.num_keys() {
            assert_eq!(translation.points()[index].in_val, rotation.points()[index].in_val);
            assert_eq!(translation.points()[index].in_val, lookup[index].time);
        }
    }

    #[test]
    fn test_sub_index_mapping() {
        let mut track = MoveTrack::new();
        track.show_translation_on_curve_ed = false;
        track.show_rotation_on_curve_ed = true;
        assert_eq!(track.num_sub_curves(), 3);
        assert_eq!(track.calc_sub_index(MoveChannel::Translation, Axis::X), None);
        assert_eq!(track.calc_sub_index(MoveChannel::Rotation, Axis::Z), Some(2));
        assert_eq!(
            track.sub_curve(1),
            Some(MoveSubCurve { channel: MoveChannel::Rotation, axis: Axis::Y })
        );
        assert_eq!(track.sub_curve(3), None);

        track.use_quat_interpolation = true;
        assert_eq!(track.num_sub_curves(), 0);
        assert_eq!(
            track.resolve_sub_curve(0),
            Err(TrackError::SubCurveOutOfRange { index: 0, count: 0 })
        );
    }

    #[test]
    fn test_create_key_evaluates_both_channels() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], InterpCurveMode::Linear);
        track.add_keyframe(2.0, [2.0, 4.0, 6.0], [90.0, 0.0, 0.0], InterpCurveMode::Linear);

        let index = track.create_new_key(1.0);
        assert_eq!(index, 1);
        let key = &track.keys()[1];
        assert_eq!(key.translation.value, [1.0, 2.0, 3.0]);
        assert_eq!(key.rotation.value, [45.0, 0.0, 0.0]);
        assert_eq!(key.lookup_group, None);
        assert_aligned(&track);
    }

    #[test]
    fn test_relative_first_key_pinned() {
        let mut track = MoveTrack::new();
        assert_eq!(track.move_frame, MoveFrame::RelativeToInitial);
        track.add_keyframe(0.0, [5.0, 5.0, 5.0], [10.0, 0.0, 0.0], InterpCurveMode::Linear);
        track.add_keyframe(1.0, [5.0, 5.0, 5.0], [10.0, 0.0, 0.0], InterpCurveMode::Linear);
        assert_eq!(track.keys()[0].translation.value, [0.0; 3]);
        assert_eq!(track.keys()[1].translation.value, [5.0; 3]);

        track.update_keyframe(0, [1.0; 3], [0.0; 3]).unwrap();
        assert_eq!(track.keys()[0].translation.value, [0.0; 3]);
        assert_eq!(track.remove_keyframe(0), Err(TrackError::PinnedFirstKey));
        assert!(track.remove_keyframe(1).is_ok());
    }

    #[test]
    fn test_disable_movement() {
        let mut track = world_track();
        track.add_keyframe(0.0, [1.0; 3], [0.0; 3], InterpCurveMode::Linear);
        track.disable_movement = true;
        track.update_keyframe(0, [7.0; 3], [0.0; 3]).unwrap();
        assert_eq!(track.keys()[0].translation.value, [1.0; 3]);
    }

    #[test]
    fn test_update_unwinds_rotation() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [170.0, -170.0, 0.0], InterpCurveMode::Linear);
        track.add_keyframe(1.0, [0.0; 3], [0.0; 3], InterpCurveMode::Linear);
        track.update_keyframe(1, [0.0; 3], [-170.0, 170.0, 350.0]).unwrap();
        assert_eq!(track.keys()[1].rotation.value, [190.0, -190.0, -10.0]);

        // The first key unwinds against the second
        track.update_keyframe(0, [0.0; 3], [180.0, -180.0, 350.0]).unwrap();
        assert_eq!(track.keys()[0].rotation.value, [180.0, -180.0, -10.0]);
    }

    #[test]
    fn test_unwind_applies_one_turn_at_most() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [0.0; 3], InterpCurveMode::Linear);
        track.add_keyframe(1.0, [0.0; 3], [720.0, -540.0, 0.0], InterpCurveMode::Linear);
        assert_eq!(track.keys()[1].rotation.value, [360.0, -180.0, 0.0]);

        // Too large for a turn to change the f32 value
        track.add_keyframe(2.0, [0.0; 3], [1.0e11, -1.0e11, f32::NAN], InterpCurveMode::Linear);
        let rotation = track.keys()[2].rotation.value;
        assert_eq!(&rotation[..2], &[1.0e11, -1.0e11]);
        assert!(rotation[2].is_nan());
    }

    #[test]
    fn test_channels_use_own_tension() {
        let mut track = world_track();
        track.show_rotation_on_curve_ed = true;
        track.lin_curve_tension = 0.0;
        track.ang_curve_tension = 0.5;
        for (time, value) in [(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)] {
            track.add_keyframe(time, [value; 3], [value; 3], InterpCurveMode::CurveAuto);
        }
        assert_eq!(track.tangents(0, 1), (10.0, 10.0));
        assert_eq!(track.tangents(3, 1), (5.0, 5.0));

        assert_eq!(track.set_key_in(2, 4.0), 2);
        assert_eq!(track.tangents(2, 1), (5.0, 5.0));
        assert_eq!(track.tangents(5, 1), (2.5, 2.5));
    }

    #[test]
    fn test_translation_edit_recomputes_rotation() {
        let mut track = world_track();
        track.show_rotation_on_curve_ed = true;
        track.ang_curve_tension = 0.5;
        for (time, value) in [(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)] {
            track.add_keyframe(time, [value; 3], [value; 3], InterpCurveMode::CurveAuto);
        }
        track.set_tangents(3, 1, 99.0, 99.0);
        assert_eq!(track.tangents(3, 1), (99.0, 99.0));
        track.set_key_out(0, 1, 10.0);
        assert_eq!(track.tangents(3, 1), (5.0, 5.0));

        track.set_tangents(4, 1, 99.0, 99.0);
        track.set_key_interp_mode(0, InterpCurveMode::CurveAuto);
        assert_eq!(track.tangents(4, 1), (5.0, 5.0));
    }

    #[test]
    #[should_panic(expected = "Key index 2 out of range")]
    fn test_key_index_out_of_range_panics() {
        let mut track = world_track();
        track.create_new_key(0.0);
        track.create_new_key(1.0);
        track.key_out(0, 2);
    }

    #[test]
    fn test_lookup_group_names() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [0.0; 3], InterpCurveMode::Linear);
        track.set_lookup_group_name(0, "Door").unwrap();
        assert_eq!(track.lookup_group_name(0), Ok(Some("Door")));
        track.clear_lookup_group_name(0).unwrap();
        assert_eq!(track.lookup_group_name(0), Ok(None));
        assert!(track.set_lookup_group_name(3, "Door").is_err());
    }

    #[test]
    fn test_duplicate_copies_label() {
        let mut track = world_track();
        track.add_keyframe(0.0, [1.0; 3], [2.0; 3], InterpCurveMode::CurveAuto);
        track.add_keyframe(1.0, [3.0; 3], [4.0; 3], InterpCurveMode::CurveAuto);
        track.set_lookup_group_name(0, "Lift").unwrap();
        assert_eq!(track.duplicate_keyframe(0, 0.5), Ok(1));
        assert_eq!(track.lookup_group_name(1), Ok(Some("Lift")));
        assert_eq!(track.keys()[1].translation.value, [1.0; 3]);
        assert_aligned(&track);
    }

    #[test]
    fn test_from_curves_rejects_misaligned() {
        let mut translation = InterpCurve::new();
        translation.add_point(0.0, [0.0; 3]);
        let mut rotation = InterpCurve::new();
        rotation.add_point(0.5, [0.0; 3]);
        let lookup = vec![LookupPoint { time: 0.0, group_name: None }];
        let settings = TrackSettings::default();

        let result = MoveTrack::from_curves(&translation, &rotation, &lookup, &settings);
        assert!(matches!(result, Err(TrackError::MisalignedCurves(_))));
        let result = MoveTrack::from_curves(&translation, &translation, &[], &settings);
        assert!(matches!(result, Err(TrackError::MisalignedCurves(_))));
    }

    #[test]
    fn test_from_curves_rejects_decreasing_times() {
        let mut curve = InterpCurve::new();
        curve.add_point(0.0, [0.0; 3]);
        curve.add_point(1.0, [1.0; 3]);
        if let Some(point) = curve.point_mut(0) {
            point.in_val = 2.0;
        }
        let lookup: Vec<_> = [2.0, 1.0]
            .into_iter()
            .map(|time| LookupPoint { time, group_name: None })
            .collect();

        let result = MoveTrack::from_curves(&curve, &curve, &lookup, &TrackSettings::default());
        assert!(matches!(result, Err(TrackError::MisalignedCurves(_))));
    }

    #[test]
    fn test_from_curves_keeps_translation_time() {
        let mut translation = InterpCurve::new();
        translation.add_point(1.0, [0.0; 3]);
        let mut rotation = InterpCurve::new();
        rotation.add_point(1.0 + KINDA_SMALL_NUMBER * 0.5, [0.0; 3]);
        let lookup = vec![LookupPoint { time: 1.0 - KINDA_SMALL_NUMBER * 0.5, group_name: None }];

        let track =
            MoveTrack::from_curves(&translation, &rotation, &lookup, &TrackSettings::default())
                .unwrap();
        let (_, rotation, lookup) = track.to_curves();
        assert_eq!(rotation.points()[0].in_val, 1.0);
        assert_eq!(lookup[0].time, 1.0);
    }

    #[test]
    fn test_curves_round_trip() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [0.0; 3], InterpCurveMode::CurveAutoClamped);
        track.add_keyframe(1.0, [4.0, 1.0, 0.0], [0.0, 90.0, 0.0], InterpCurveMode::CurveAutoClamped);
        track.add_keyframe(3.0, [2.0, 0.0, 1.0], [0.0, 45.0, 0.0], InterpCurveMode::Constant);
        track.set_lookup_group_name(2, "Target").unwrap();
        track.set_interp_method(MoveChannel::Rotation, InterpMethod::FixedTangentEval);

        let (translation, rotation, lookup) = track.to_curves();
        assert_eq!(rotation.interp_method(), InterpMethod::FixedTangentEval);
        let settings = TrackSettings { move_frame: MoveFrame::World, ..Default::default() };
        let rebuilt = MoveTrack::from_curves(&translation, &rotation, &lookup, &settings).unwrap();
        assert_eq!(rebuilt.keys(), track.keys());
        assert_eq!(rebuilt.interp_method(MoveChannel::Rotation), InterpMethod::FixedTangentEval);
    }

    #[test]
    fn test_upgrade_bakes_shared_mode() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [0.0; 3], InterpCurveMode::CurveAuto);
        track.add_keyframe(1.0, [1.0; 3], [10.0; 3], InterpCurveMode::CurveAuto);
        track.add_keyframe(2.0, [3.0; 3], [20.0; 3], InterpCurveMode::CurveAuto);
        track.set_interp_method(MoveChannel::Rotation, InterpMethod::BrokenTangentEval);
        assert!(track.using_legacy_interp_method());

        let before = track.tangents(0, 1);
        track.upgrade_interp_method();
        assert!(!track.using_legacy_interp_method());
        assert_eq!(track.key_interp_mode(1), InterpCurveMode::CurveUser);
        assert_eq!(track.tangents(0, 1), before);
    }

    #[test]
    fn test_set_keyframe_time_in_place() {
        let mut track = world_track();
        track.add_keyframe(0.0, [0.0; 3], [0.0; 3], InterpCurveMode::Linear);
        track.add_keyframe(1.0, [1.0; 3], [0.0; 3], InterpCurveMode::Linear);
        assert_eq!(track.set_keyframe_time(0, 0.25, false), 0);
        assert_eq!(track.keyframe_time(0), Some(0.25));
        assert_eq!(track.set_keyframe_time(0, 2.0, true), 1);
        assert_eq!(track.keys()[1].translation.value, [0.0; 3]);
        assert_eq!(track.set_keyframe_time(5, 2.0, true), 5);
    }
}
