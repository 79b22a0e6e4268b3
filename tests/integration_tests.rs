//! Integration tests for the tempo profiling pipeline

use tempo_profile::{
    analyze_timeline, analyze_timelines, classify_tempo, resolve_dominant_tempo,
    smooth_tempo_curve, AnalysisConfig, ProfileFlag, TempoError, TempoRegime, TempoTimeline,
};

/// Rubato-style timeline: a slow introduction, a long Andante body and a
/// short accelerando at the end
fn andante_timeline() -> TempoTimeline {
    TempoTimeline::new(
        vec![0.0, 8.0, 12.0, 16.0, 60.0, 70.0, 75.0, 78.0],
        vec![72.0, 88.0, 90.0, 96.0, 94.0, 100.0, 112.0, 118.0],
    )
    .expect("valid timeline")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_andante_piece() {
        let timeline = andante_timeline();
        let profile = analyze_timeline(&timeline, &AnalysisConfig::default())
            .expect("Analysis should succeed");

        // 16s..60s (tempo 94) covers 44 of 78 seconds
        assert_eq!(profile.dominant_bpm(), 94.0);
        assert_eq!(profile.regime, TempoRegime::Moderate);
        assert_eq!(profile.label(), "Andante");
        assert!(profile.has_flag(ProfileFlag::MultipleCandidates));

        // Renderer contract: aligned, equal-length sequences
        assert_eq!(profile.change_times.len(), profile.tempos.len());
        assert_eq!(profile.smoothed_tempos.len(), profile.tempos.len());
        assert_eq!(profile.metadata.change_points, 8);
        assert_eq!(profile.metadata.smoothing_window, Some(5));
        assert_eq!(profile.metadata.duration_seconds, 78.0);

        // Andante tolerance band is [66, 118]
        assert_eq!(profile.tolerance_band.lower, Some(66.0));
        assert_eq!(profile.tolerance_band.upper, Some(118.0));
        assert!(profile
            .smoothed_tempos
            .iter()
            .all(|&bpm| (66.0..=118.0).contains(&bpm)));
    }

    #[test]
    fn test_stages_compose_like_pipeline() {
        let timeline = andante_timeline();
        let dominant = resolve_dominant_tempo(timeline.change_times(), timeline.tempos()).unwrap();
        let label = classify_tempo(dominant.bpm, timeline.tempos())
            .unwrap()
            .expect("a tempo class should match");
        let smoothed = smooth_tempo_curve(timeline.tempos(), label).unwrap();

        let profile = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap();
        assert_eq!(profile.label(), label);
        assert_eq!(profile.smoothed_tempos, smoothed);
    }

    #[test]
    fn test_single_change_point_profile() {
        let timeline = TempoTimeline::constant(52.0).unwrap();
        let profile = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap();

        assert_eq!(profile.dominant_bpm(), 52.0);
        assert_eq!(profile.label(), "Largo");
        assert_eq!(profile.smoothed_tempos, vec![52.0]);
        assert!(profile.has_flag(ProfileFlag::SmoothingBypassed));
        assert_eq!(profile.metadata.smoothing_window, None);
    }

    #[test]
    fn test_zero_duration_timeline_is_soft() {
        let timeline = TempoTimeline::new(vec![0.0, 0.0, 0.0], vec![140.0, 150.0, 160.0]).unwrap();
        let profile = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap();

        assert_eq!(profile.dominant_bpm(), 160.0);
        assert!(profile.has_flag(ProfileFlag::ZeroDuration));
        assert_eq!(profile.label(), "Allegro");
    }

    #[test]
    fn test_unclassifiable_timeline_surfaces_unknown_label() {
        // Dominant 20 BPM selects the slow regime, but 100 BPM rules out
        // Larghissimo and no slow band holds either value
        let timeline = TempoTimeline::new(vec![0.0, 1.0, 30.0], vec![100.0, 100.0, 20.0]).unwrap();
        assert_eq!(classify_tempo(20.0, timeline.tempos()).unwrap(), None);

        let err = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, TempoError::UnknownLabel(_)), "{}", err);
        assert!(err.to_string().contains("20.00 BPM"));
    }

    #[test]
    fn test_fast_piece_with_clamping() {
        let timeline = TempoTimeline::new(
            vec![0.0, 2.0, 4.0, 40.0, 42.0],
            vec![100.0, 140.0, 150.0, 152.0, 240.0],
        )
        .unwrap();
        let profile = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap();

        assert_eq!(profile.dominant_bpm(), 152.0);
        assert_eq!(profile.label(), "Allegro");
        // Allegro band widens to [110, 178]: the 240 BPM spike gets clamped
        assert!(profile.has_flag(ProfileFlag::CurveClamped));
        assert!(profile.smoothed_tempos.iter().all(|&bpm| bpm <= 178.0 && bpm >= 110.0));
    }

    #[test]
    fn test_custom_tolerance() {
        let timeline = andante_timeline();
        let config = AnalysisConfig {
            smoothing_tolerance_bpm: 0.0,
            ..AnalysisConfig::default()
        };
        let profile = analyze_timeline(&timeline, &config).unwrap();

        assert_eq!(profile.tolerance_band.lower, Some(76.0));
        assert_eq!(profile.tolerance_band.upper, Some(108.0));
        assert!(profile.smoothed_tempos.iter().all(|&bpm| (76.0..=108.0).contains(&bpm)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig {
            max_smoothing_window: 1,
            ..AnalysisConfig::default()
        };
        let result = analyze_timeline(&andante_timeline(), &config);
        assert!(matches!(result, Err(TempoError::InvalidInput(_))));
    }

    #[test]
    fn test_high_fit_order_on_short_timeline() {
        // Accepted config whose order only fits the full 5-point window
        let config = AnalysisConfig {
            smoothing_poly_order: 3,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_ok());

        let timeline = TempoTimeline::new(vec![0.0, 10.0, 20.0], vec![96.0, 100.0, 104.0]).unwrap();
        let profile = analyze_timeline(&timeline, &config).unwrap();

        assert_eq!(profile.label(), "Andante");
        assert_eq!(profile.metadata.smoothing_window, Some(3));
        assert_eq!(profile.smoothed_tempos.len(), 3);
        assert!(!profile.has_flag(ProfileFlag::SmoothingBypassed));
    }

    #[test]
    fn test_batch_preserves_order() {
        let timelines = vec![
            andante_timeline(),
            TempoTimeline::constant(20.0).unwrap(),
            TempoTimeline::constant(180.0).unwrap(),
            TempoTimeline::new(vec![0.0, 1.0, 30.0], vec![100.0, 100.0, 20.0]).unwrap(),
        ];
        let results = analyze_timelines(&timelines, &AnalysisConfig::default());

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().label(), "Andante");
        assert_eq!(results[1].as_ref().unwrap().label(), "Larghissimo");
        assert_eq!(results[2].as_ref().unwrap().label(), "Presto");
        assert!(results[3].is_err());
    }

    #[test]
    fn test_profile_serializes_to_json() {
        let profile = analyze_timeline(&andante_timeline(), &AnalysisConfig::default()).unwrap();
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["tempo_class"]["label"], "Andante");
        assert_eq!(json["regime"], "Moderate");
        assert_eq!(json["smoothed_tempos"].as_array().unwrap().len(), 8);

        let restored: tempo_profile::TempoProfile = serde_json::from_value(json).unwrap();
        assert_eq!(restored.label(), "Andante");
    }

    #[cfg(feature = "midi")]
    #[test]
    fn test_analyze_midi_tempo_map() {
        use midly::{Format, Header, MetaMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

        fn tempo(delta: u32, bpm: f64) -> TrackEvent<'static> {
            let us_per_beat = (60_000_000.0 / bpm) as u32;
            TrackEvent {
                delta: delta.into(),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat.into())),
            }
        }

        // 8 beats at 60 BPM (8s), then 64 beats at 96 BPM (40s), then 8 beats at 120 BPM
        let mut track = Track::new();
        track.push(tempo(0, 60.0));
        track.push(tempo(8 * 480, 96.0));
        track.push(tempo(64 * 480, 120.0));
        track.push(TrackEvent {
            delta: (8u32 * 480).into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        let smf = Smf {
            header: Header::new(Format::Parallel, Timing::Metrical(480u16.into())),
            tracks: vec![track],
        };
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();

        let timeline = tempo_profile::read_tempo_map(&bytes).unwrap();
        assert_eq!(timeline.len(), 3);
        assert!((timeline.change_times()[1] - 8.0).abs() < 1e-3);
        assert!((timeline.change_times()[2] - 48.0).abs() < 1e-3);

        // [0s, 8s) counts for 96 BPM and [8s, 48s) for 120 BPM
        let profile = analyze_timeline(&timeline, &AnalysisConfig::default()).unwrap();
        assert!((profile.dominant_bpm() - 120.0).abs() < 0.01);
        assert_eq!(profile.regime, TempoRegime::Moderate);
    }
}
