// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tracks driven through the generic curve editor surface.

use interp_curve::InterpCurveMode;
use interp_tracks::{
    Axis, CurveEdInterface, FloatTrack, KeyframeTrack, MoveChannel, MoveFrame, MoveTrack, Track,
    TrackData, TrackSettings, VectorTrack,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("interp_tracks=debug".parse().unwrap());
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn move_track(show_translation: bool, show_rotation: bool, quat: bool) -> MoveTrack {
    let settings = TrackSettings {
        show_translation_on_curve_ed: show_translation,
        show_rotation_on_curve_ed: show_rotation,
        use_quat_interpolation: quat,
        move_frame: MoveFrame::World,
        ..Default::default()
    };
    MoveTrack::from_settings(&settings)
}

fn assert_move_aligned(track: &MoveTrack) {
    let (translation, rotation, lookup) = track.to_curves();
    let count = track.num_keys();
    assert_eq!((translation.len(), rotation.len(), lookup.len()), (count, count, count));
    for index in 0..count {
        let time = track.key_in(index);
        assert_eq!(translation.points()[index].in_val, time);
        assert_eq!(rotation.points()[index].in_val, time);
        assert_eq!(lookup[index].time, time);
    }
}

#[test]
fn test_move_keys_stay_aligned() {
    init_tracing();
    let mut track = move_track(true, true, false);
    for time in [0.5, 2.0, 1.0, 3.0, 0.0] {
        track.create_new_key(time);
        assert_move_aligned(&track);
    }
    track.set_key_in(0, 2.5);
    assert_move_aligned(&track);
    track.delete_key(1);
    assert_move_aligned(&track);
    track.set_key_out(4, 2, 30.0);
    track.set_key_interp_mode(1, InterpCurveMode::CurveAutoClamped);
    assert_move_aligned(&track);

    let times: Vec<_> = (0..track.num_keys()).map(|index| track.key_in(index)).collect();
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_sub_index_mapping_for_every_flag_combination() {
    for bits in 0..8u8 {
        let (show_t, show_r, quat) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let track = move_track(show_t, show_r, quat);
        let t = usize::from(show_t);
        let r = usize::from(show_r && !quat);

        assert_eq!(track.num_sub_curves(), 3 * t + 3 * r, "flags {bits:03b}");
        for axis in Axis::ALL {
            let expected_t = show_t.then(|| axis.index());
            let expected_r = (r == 1).then(|| 3 * t + axis.index());
            assert_eq!(track.calc_sub_index(MoveChannel::Translation, axis), expected_t);
            assert_eq!(track.calc_sub_index(MoveChannel::Rotation, axis), expected_r);
        }
        for sub in 0..track.num_sub_curves() {
            let resolved = track.sub_curve(sub).unwrap();
            assert_eq!(track.calc_sub_index(resolved.channel, resolved.axis), Some(sub));
        }
        assert_eq!(track.sub_curve(track.num_sub_curves()), None);
    }
}

#[test]
fn test_values_round_trip_at_keys() {
    let mut float = FloatTrack::new();
    let mut vector = VectorTrack::new();
    let mut movement = move_track(true, true, false);
    for (index, time) in [0.0_f32, 1.0, 2.5].into_iter().enumerate() {
        float.create_new_key(time);
        vector.create_new_key(time);
        movement.create_new_key(time);
        let value = index as f32 * 3.0 - 2.0;
        float.set_key_out(0, index, value);
        for sub in 0..3 {
            vector.set_key_out(sub, index, value + sub as f32);
        }
        for sub in 0..6 {
            movement.set_key_out(sub, index, value * sub as f32);
        }
    }

    let tracks: [&dyn CurveEdInterface; 3] = [&float, &vector, &movement];
    for track in tracks {
        for sub in 0..track.num_sub_curves() {
            for key in 0..track.num_keys() {
                let expected = track.key_out(sub, key);
                let actual = track.eval_sub(sub, track.key_in(key));
                assert!((expected - actual).abs() < 1e-4, "sub {sub} key {key}");
            }
        }
    }
}

#[test]
fn test_create_past_end_appends() {
    let mut track = move_track(true, false, false);
    for time in [0.0, 1.0, 2.0] {
        track.create_new_key(time);
    }
    assert_eq!(track.create_new_key(10.0), 3);
    assert_eq!(track.num_keys(), 4);
    let (translation, rotation, lookup) = track.to_curves();
    assert_eq!((translation.len(), rotation.len(), lookup.len()), (4, 4, 4));
}

#[test]
fn test_delete_shifts_later_keys() {
    let mut track = move_track(true, false, false);
    for time in [0.0, 1.0, 2.0, 3.0] {
        let index = track.create_new_key(time);
        track.set_key_out(0, index, time * 10.0);
    }
    track.delete_key(1);
    assert_eq!(track.num_keys(), 3);
    assert_eq!(track.key_in(1), 2.0);
    assert_eq!(track.key_out(0, 1), 20.0);
    assert_eq!(track.key_in(2), 3.0);
    assert_eq!(track.key_out(0, 2), 30.0);
}

#[test]
fn test_empty_out_range_is_zero() {
    assert_eq!(move_track(true, true, false).out_range(), (0.0, 0.0));
    assert_eq!(move_track(false, false, false).out_range(), (0.0, 0.0));
    assert_eq!(FloatTrack::new().out_range(), (0.0, 0.0));
    assert_eq!(VectorTrack::new().out_range(), (0.0, 0.0));
    assert_eq!(VectorTrack::new().in_range(), (0.0, 0.0));
}

#[test]
fn test_move_out_range_covers_visible_channels() {
    let mut track = move_track(true, false, false);
    track.add_keyframe(0.0, [1.0, 2.0, 3.0], [-90.0, 0.0, 0.0], InterpCurveMode::Linear);
    track.add_keyframe(1.0, [4.0, 5.0, 6.0], [90.0, 0.0, 0.0], InterpCurveMode::Linear);
    assert_eq!(track.out_range(), (1.0, 6.0));

    track.show_rotation_on_curve_ed = true;
    assert_eq!(track.out_range(), (-90.0, 90.0));

    track.show_translation_on_curve_ed = false;
    assert_eq!(track.out_range(), (-90.0, 90.0));
}

#[test]
#[should_panic(expected = "Sub-curve index 3 out of range")]
fn test_hidden_rotation_sub_curve_panics() {
    let mut track = move_track(true, false, false);
    track.create_new_key(0.0);
    assert_eq!(track.num_sub_curves(), 3);
    track.key_out(3, 0);
}

#[test]
fn test_vector_create_on_empty() {
    let mut track = VectorTrack::new();
    assert_eq!(track.create_new_key(5.0), 0);
    assert_eq!(track.num_keys(), 1);
    assert_eq!(track.key_in(0), 5.0);
    assert_eq!([track.key_out(0, 0), track.key_out(1, 0), track.key_out(2, 0)], [0.0; 3]);
}

#[test]
fn test_move_key_colors() {
    let mut track = move_track(true, true, false);
    track.create_new_key(0.0);
    let colors: Vec<_> = (0..6).map(|sub| track.key_color(sub, 0, [0, 0, 0])).collect();
    assert_eq!(
        colors,
        vec![
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [255, 128, 128],
            [128, 255, 128],
            [128, 128, 255],
        ]
    );
}

#[test]
fn test_move_set_tangents_is_kept_until_next_edit() {
    let mut track = move_track(true, false, false);
    for time in [0.0, 1.0, 2.0] {
        let index = track.create_new_key(time);
        track.set_key_interp_mode(index, InterpCurveMode::CurveAuto);
    }
    track.set_key_out(0, 2, 4.0);
    track.set_tangents(0, 1, 9.0, 9.0);
    assert_eq!(track.tangents(0, 1), (9.0, 9.0));

    // Any value edit recomputes auto tangents
    track.set_key_out(1, 0, 0.0);
    let (arrive, leave) = track.tangents(0, 1);
    assert!((arrive - 2.0).abs() < 1e-5);
    assert_eq!(arrive, leave);
}

#[test]
fn test_tracks_through_dyn_views() {
    init_tracing();
    let mut track = Track::new("Move", TrackData::Move(move_track(true, false, false)));
    let editor = track.data.curve_ed_mut();
    editor.create_new_key(0.0);
    editor.create_new_key(2.0);

    let keys = track.data.keyframes_mut();
    assert_eq!(keys.duplicate_keyframe(1, 1.0), Ok(1));
    assert_eq!(keys.time_range(), (0.0, 2.0));
    assert_eq!(keys.closest_snap_position(1.8, &[2]), Some(1.0));
    assert_eq!(track.duration(), 2.0);
    assert_eq!(track.key_color(2, 0), [0, 0, 255]);
}
