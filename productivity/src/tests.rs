/// Route 17, direction 1: five segments departing from stops 101 to 105 and ending at the
/// depot (106). Ridership was counted at 101, 103 and 105, plus at stop 999, which the
/// schedule does not know.
pub(crate) mod route_17 {
    use crate::feed::Feed;
    use crate::types::{Ridership, Segment, StopRidership};
    use common::types::{DirectionId, RouteId, SeqNum, StopId};
    use common::util::distance::Distance;
    use common::util::wkt::to_wkt_linestring;
    use geo::{Coord, LineString};
    use polars::df;
    use polars::frame::DataFrame;
    use polars::prelude::IntoLazy;

    pub(crate) const ROUTE_ID: &str = "5617";
    pub(crate) const NAMES: [&str; 6] = ["Main St", "2nd Ave", "3rd Ave", "4th Ave", "5th Ave", "Depot"];
    pub(crate) const DISTANCES: [f64; 5] = [400.0, 800.0, 1609.0, 3218.0, 1200.0];
    pub(crate) const RUNTIMES: [f64; 5] = [60.0, 120.0, 180.0, 240.0, 90.0];
    pub(crate) const TRIPS: f64 = 30.0;
    /// Boardings at the three stops the schedule knows
    pub(crate) const MATCHED_BOARDINGS: f64 = 9.0;

    fn line(i: usize) -> LineString<f64> {
        LineString::new(vec![
            Coord { x: i as f64, y: 0.0 },
            Coord { x: (i + 1) as f64, y: 0.0 },
        ])
    }

    pub(crate) fn segments() -> Vec<Segment> {
        (0..5).map(|i| Segment {
            route_id: RouteId(ROUTE_ID.into()),
            direction: DirectionId(1),
            stop_sequence: SeqNum(i as u32),
            start_stop_id: StopId(101 + i as i64),
            end_stop_id: StopId(102 + i as i64),
            start_stop_name: NAMES[i].into(),
            end_stop_name: NAMES[i + 1].into(),
            distance: Distance(DISTANCES[i]),
            runtime_secs: RUNTIMES[i],
            shape_id: "17_1".into(),
            geometry: line(i),
        }).collect()
    }

    fn stop(stop_id: i64, boardings: f64, alightings: f64, load: f64, sequence: i64, name: &str) -> StopRidership {
        StopRidership {
            stop_id: StopId(stop_id),
            ridership: Ridership { boardings, alightings, load },
            sequence_hint: Some(sequence),
            stop_name: Some(name.into()),
        }
    }

    pub(crate) fn stop_ridership() -> Vec<StopRidership> {
        vec![
            stop(101, 5.0, 0.0, 5.0, 0, "Main St"),
            stop(103, 3.0, 2.0, 6.0, 2, "3rd Ave"),
            stop(105, 1.0, 4.0, 3.0, 4, "5th Ave"),
            stop(999, 2.0, 1.0, 4.0, 3, "4th Ave (old)"),
        ]
    }

    /// Raw APC samples that aggregate to [`stop_ridership`] for route 17, direction 1, weekdays
    pub(crate) fn ridership_samples() -> DataFrame {
        df![
            "LineAbbr" => [17i64, 17, 17, 17, 17, 17, 17, 2],
            "Direction" => [1i64, 1, 1, 1, 1, 0, 1, 1],
            "Service" => ["Weekday", "Weekday", "Weekday", "Weekday", "Weekday", "Weekday", "Saturday", "Weekday"],
            "StopId" => [101i64, 101, 103, 105, 999, 103, 103, 101],
            "AverageOn" => [2.0, 3.0, 3.0, 1.0, 2.0, 7.0, 7.0, 7.0],
            "AverageOff" => [0.0, 0.0, 2.0, 4.0, 1.0, 7.0, 7.0, 7.0],
            "Sequence" => [0i64, 0, 2, 4, 3, 2, 2, 0],
            "AverageLoad" => [2.0, 3.0, 6.0, 3.0, 4.0, 7.0, 7.0, 7.0],
            "StopName" => ["Main St", "Main St", "3rd Ave", "5th Ave", "4th Ave (old)", "3rd Ave", "3rd Ave", "Main St"],
        ].unwrap()
    }

    pub(crate) fn segments_frame() -> DataFrame {
        let segments = segments();
        df![
            "route_id" => segments.iter().map(|s| s.route_id.0.clone()).collect::<Vec<_>>(),
            "route_short_name" => vec!["17"; 5],
            "direction_id" => vec![1i64; 5],
            "stop_sequence" => segments.iter().map(|s| s.stop_sequence.0 as i64).collect::<Vec<_>>(),
            "start_stop_id" => segments.iter().map(|s| s.start_stop_id.0).collect::<Vec<_>>(),
            "end_stop_id" => segments.iter().map(|s| s.end_stop_id.0).collect::<Vec<_>>(),
            "start_stop_name" => segments.iter().map(|s| s.start_stop_name.clone()).collect::<Vec<_>>(),
            "end_stop_name" => segments.iter().map(|s| s.end_stop_name.clone()).collect::<Vec<_>>(),
            "distance_m" => DISTANCES.to_vec(),
            "runtime_sec" => RUNTIMES.to_vec(),
            "shape_id" => vec!["17_1"; 5],
            "geometry" => segments.iter().map(|s| to_wkt_linestring(&s.geometry)).collect::<Vec<_>>(),
        ].unwrap()
    }

    pub(crate) fn feed() -> Feed {
        Feed {
            routes: df![
                "route_id" => [ROUTE_ID, "5618", "77", "78"],
                "route_short_name" => ["17", "200", "F11", "F11"],
            ].unwrap().lazy(),
            segments: segments_frame().lazy(),
            frequencies: df![
                "route_id" => [ROUTE_ID, ROUTE_ID, ROUTE_ID, "5618"],
                "direction_id" => [1i64, 1, 0, 1],
                "ntrips" => [20i64, 10, 25, 40],
            ].unwrap().lazy(),
            time_windows: vec![0, 24],
        }
    }
}
