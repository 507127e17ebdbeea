use enctrace::aggregator::{aggregate_run, FrameAggregator};
use enctrace::commands::{execute_analyze, AnalyzeArgs};
use enctrace::output::read_report;
use enctrace::parser::parse_events;
use enctrace::registry::{NamedGap, StageRegistry};
use pretty_assertions::assert_eq;
use std::io::Write;

/// Synthetic 3-frame trace exercising every fold rule:
/// - duplicate RESOURCE sub-events (first-write-wins / max-wins / CPU sum)
/// - ME segments arriving out of temporal order
/// - an ENTROPY sub-event tagged as duplicate accounting (outType 0)
/// - an untracked informational stage
const TRACE: &str = "\
proc, inType, outType, poc, segIdx, tileIdx, stime, etime, duration
RESOURCE, 0, 1, 0, 0, 0, 0.0, 1.0, 1.0
RESOURCE, 0, 1, 0, 0, 0, 0.5, 2.0, 0.5
ME, 0, 1, 0, 1, 0, 3.0, 4.0, 1.0
ME, 0, 1, 0, 0, 0, 3.5, 5.0, 1.0
ENTROPY, 0, 2, 0, 0, 0, 6.0, 7.0, 1.0
ENTROPY, 0, 0, 0, 0, 0, 6.0, 7.5, 9.9
PAK, 0, 1, 0, 0, 0, 7.5, 8.0, 0.5
FOO, 0, 0, 0, 0, 0, 0.0, 1.0, 1.0
RESOURCE, 0, 1, 1, 0, 0, 10.0, 11.0, 1.0
PAK, 0, 1, 1, 0, 0, 15.0, 18.0, 2.0
RESOURCE, 0, 1, 2, 0, 0, 20.0, 21.0, 1.0
";

fn write_trace_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("trace.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(TRACE.as_bytes()).unwrap();
    path
}

#[test]
fn test_fold_and_aggregate_pipeline() {
    let registry = StageRegistry::encoder_pipeline();
    let events = parse_events(TRACE.as_bytes()).unwrap();
    assert_eq!(events.len(), 11);

    let mut aggregator = FrameAggregator::new(&registry, 3);
    for event in &events {
        aggregator.fold_event(event);
    }
    let frames = aggregator.into_frames();

    // RESOURCE: first-write-wins start, max-wins end, summed CPU.
    let resource = frames[0].stage(0);
    assert_eq!(resource.start_time(), 0.0);
    assert_eq!(resource.end_time(), 2.0);
    assert_eq!(resource.cpu_time(), 1.5);

    // ME: start from segment 0 only, despite segment 1 arriving first.
    let me = registry.index_of("ME").unwrap();
    assert_eq!(frames[0].stage(me).start_time(), 3.5);
    assert_eq!(frames[0].stage(me).end_time(), 5.0);
    assert_eq!(frames[0].stage(me).cpu_time(), 2.0);

    // ENTROPY: duplicate-tagged sub-event contributes nothing.
    let entropy = registry.index_of("ENTROPY").unwrap();
    assert_eq!(frames[0].stage(entropy).cpu_time(), 1.0);
    assert_eq!(frames[0].stage(entropy).end_time(), 7.0);

    // Frame totals: 1.5 + 2.0 + 1.0 + 0.5 CPU, RESOURCE start to PAK end.
    assert_eq!(frames[0].frame_cpu_time(), 5.0);
    assert_eq!(frames[0].frame_latency(&registry), 8.0);
    assert_eq!(frames[0].named_gap(&registry, NamedGap::Pak), 0.5);

    // PD gap query: neither PA nor PD received events, degenerate zero.
    assert_eq!(frames[0].named_gap(&registry, NamedGap::Pd), 0.0);

    // Run aggregates: frame 2 is populated but excluded everywhere.
    let summary = aggregate_run(&registry, &frames);
    assert_eq!(summary.counted_frames(), 2);
    assert_eq!(summary.average_cpu_time(), 4.0);
    assert_eq!(summary.average_latency(), 8.0);
    assert_eq!(summary.max_latency(), 8.0);
}

#[test]
fn test_execute_analyze_writes_all_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace_file(dir.path());
    let out_dir = dir.path().join("out");

    execute_analyze(AnalyzeArgs {
        input: input.clone(),
        frame_count: 3,
        out_dir: Some(out_dir.clone()),
        split_frames: true,
        print_summary: false,
    })
    .unwrap();

    // CSV tables: header + 2 counted frames + Avg row.
    let cputime = std::fs::read_to_string(out_dir.join("cputime.csv")).unwrap();
    assert_eq!(cputime.lines().count(), 4);
    assert!(cputime.lines().next().unwrap().starts_with("POC,    CPU, RES"));
    assert!(cputime.lines().last().unwrap().starts_with("Avg,    4.0"));

    let latency = std::fs::read_to_string(out_dir.join("latency.csv")).unwrap();
    assert_eq!(latency.lines().count(), 4);
    assert!(latency.lines().next().unwrap().ends_with("pak_s, pm_s, irc_s, overhead"));
    assert!(latency.lines().last().unwrap().starts_with("Avg,   8.0"));

    // Per-frame splits: counted frames only, untracked FOO line included raw.
    let frame0 = std::fs::read_to_string(out_dir.join("frames/frame00.csv")).unwrap();
    assert_eq!(frame0.lines().count(), 8);
    let frame1 = std::fs::read_to_string(out_dir.join("frames/frame01.csv")).unwrap();
    assert_eq!(frame1.lines().count(), 2);
    assert!(!out_dir.join("frames/frame02.csv").exists());

    // JSON summary round-trips.
    let report = read_report(out_dir.join("summary.json")).unwrap();
    assert_eq!(report.frame_count, 3);
    assert_eq!(report.counted_frames, 2);
    assert_eq!(report.average_latency, 8.0);
    assert_eq!(report.average_cpu_time, 4.0);
    assert_eq!(report.stages.len(), 12);
}

#[test]
fn test_execute_analyze_rejects_malformed_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "header\nRESOURCE, 0, 1, nope, 0, 0, 0.0, 1.0, 1.0\n").unwrap();

    let result = execute_analyze(AnalyzeArgs {
        input: path,
        frame_count: 2,
        out_dir: Some(dir.path().join("out")),
        split_frames: false,
        print_summary: false,
    });
    assert!(result.is_err());
}
