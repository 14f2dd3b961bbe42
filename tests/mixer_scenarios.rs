//! End-to-end mixer behaviour on the headless output.

use am_master::{
    default_profiles, AmbientMixer, AssetLoader, AudioOutput, Diagnostic, MixerConfig, MixerError,
    NullOutput, PlaybackState, VolumeChanged,
};

fn config() -> MixerConfig {
    MixerConfig {
        sounds_dir: "/nonexistent/ambimix-sounds".into(),
        duration_secs: 0.01,
        seed: Some(42),
        ..MixerConfig::default()
    }
}

fn start(output: NullOutput) -> AmbientMixer<NullOutput> {
    AmbientMixer::initialize(output, &default_profiles(), &config()).unwrap()
}

fn stereo() -> AmbientMixer<NullOutput> {
    start(NullOutput::new(44_100, Some(2)))
}

fn solo(mixer: &AmbientMixer<NullOutput>, name: &str) {
    let names: Vec<String> = mixer.channel_names().map(String::from).collect();
    for other in names {
        mixer.set_gain(&other, if other == name { 100.0 } else { 0.0 });
    }
}

#[test]
fn all_profiles_loop_at_fifty_percent() {
    let mixer = stereo();
    assert_eq!(mixer.channels().len(), 8);
    for name in mixer.channel_names() {
        assert_eq!(mixer.gain_percent(name), Some(50));
        assert_eq!(mixer.playback_state(name), Some(PlaybackState::Looping));
    }
    // No files on disk: one MissingAsset per profile.
    assert_eq!(mixer.diagnostics().len(), 8);
    assert!(mixer
        .diagnostics()
        .iter()
        .all(|d| matches!(d, Diagnostic::MissingAsset { .. })));
}

#[test]
fn volume_event_sets_gain_and_reports_percent() {
    let mixer = stereo();
    assert_eq!(mixer.volume_changed(&VolumeChanged::new("Fire", 75.0)), Some(75));
    assert_eq!(mixer.current_gain("Fire"), Some(0.75));
    assert_eq!(mixer.gain_percent("Wind"), Some(50));
}

#[test]
fn unknown_channel_is_ignored() {
    let mixer = stereo();
    assert_eq!(mixer.volume_changed(&VolumeChanged::new("Nonexistent", 50.0)), None);
    assert!(mixer.channel_names().all(|n| mixer.gain_percent(n) == Some(50)));
}

#[test]
fn out_of_range_volume_is_clamped() {
    let mixer = stereo();
    assert_eq!(mixer.set_gain("Wind", 150.0), Some(100));
    assert_eq!(mixer.current_gain("Wind"), Some(1.0));
    assert_eq!(mixer.set_gain("Wind", -20.0), Some(0));
    assert_eq!(mixer.current_gain("Wind"), Some(0.0));
}

#[test]
fn solo_channel_at_full_gain_plays_its_buffer_verbatim() {
    let mut mixer = stereo();
    solo(&mixer, "Fire");
    let fire = mixer.asset("Fire").unwrap().buffer().clone();

    let rendered = mixer.output_mut().render(fire.frames());
    assert_eq!(rendered.as_slice(), fire.samples());
}

#[test]
fn playback_loops_seamlessly() {
    let mut mixer = stereo();
    solo(&mixer, "Crickets");
    let frames = mixer.asset("Crickets").unwrap().buffer().frames();

    let rendered = mixer.output_mut().render(frames * 2 + 3);
    let (first, rest) = rendered.split_at(frames * 2);
    assert_eq!(&rest[..frames * 2], first);
}

#[test]
fn rainfall_without_file_synthesizes_default_length() {
    let dir = tempfile::tempdir().unwrap();
    let config = MixerConfig {
        sounds_dir: dir.path().to_path_buf(),
        seed: Some(7),
        ..MixerConfig::default()
    };
    let rainfall = default_profiles()
        .into_iter()
        .find(|p| p.name == "Rainfall")
        .unwrap();

    let outcome = AssetLoader::new(&config, Some(2)).load_or_synthesize(&rainfall);
    let buffer = outcome.asset.buffer();
    assert_eq!(buffer.frames(), 352_800);
    assert_eq!(buffer.channels(), 2);
    assert_eq!(buffer.samples().len(), 705_600);
    assert!(outcome.diagnostics.iter().any(|d| d.profile() == "Rainfall"));
    assert!(outcome.diagnostics[0].to_string().contains("rain.wav"));
}

#[test]
fn mono_device_gets_mono_assets() {
    let mut mixer = start(NullOutput::new(44_100, Some(1)));
    for name in mixer.channel_names() {
        assert!(mixer.asset(name).unwrap().buffer().is_mono());
    }
    let mismatches = mixer
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::ChannelLayoutMismatch { .. }))
        .count();
    assert_eq!(mismatches, 8);

    assert_eq!(mixer.output().frame_width(), 1);
    assert_eq!(mixer.output_mut().render(10).len(), 10);
}

#[test]
fn silent_device_defaults_to_stereo() {
    let mixer = start(NullOutput::new(44_100, None));
    assert_eq!(mixer.asset("Birds").unwrap().buffer().channels(), 2);
    assert!(!mixer
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::ChannelLayoutMismatch { .. })));
}

#[test]
fn shutdown_is_idempotent() {
    let mut mixer = stereo();
    mixer.shutdown();
    mixer.shutdown();

    assert!(!mixer.is_running());
    assert!(mixer
        .channel_names()
        .all(|n| mixer.playback_state(n) == Some(PlaybackState::Stopped)));
    assert!(mixer.output_mut().render(16).iter().all(|&s| s == 0));
    drop(mixer);
}

#[test]
fn device_that_will_not_start_is_fatal() {
    let result =
        AmbientMixer::initialize(NullOutput::failing(44_100, Some(2)), &default_profiles(), &config());
    assert!(matches!(result, Err(MixerError::DeviceInit(_))));
}

#[test]
fn assets_are_built_at_the_rate_the_device_opened_with() {
    let mixer = start(NullOutput::new(48_000, Some(2)));
    for name in mixer.channel_names() {
        let buffer = mixer.asset(name).unwrap().buffer();
        assert_eq!(buffer.sample_rate(), mixer.output().sample_rate());
        assert_eq!(buffer.frames(), 480);
    }
}

#[test]
fn wider_device_gets_assets_at_its_channel_count() {
    let mut mixer = start(NullOutput::new(44_100, Some(6)));
    assert!(mixer
        .channel_names()
        .all(|n| mixer.asset(n).unwrap().buffer().channels() == 6));
    assert!(!mixer
        .diagnostics()
        .iter()
        .any(|d| matches!(d, Diagnostic::ChannelLayoutMismatch { .. })));

    solo(&mixer, "Rainfall");
    let rain = mixer.asset("Rainfall").unwrap().buffer().clone();
    let out = mixer.output_mut().render(rain.frames());
    assert_eq!(out.len(), rain.frames() * 6);
    assert_eq!(out.as_slice(), rain.samples());
}
