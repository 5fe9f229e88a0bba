//! Stand-in `qsub`/`qstat` shell scripts.
//!
//! `qsub` logs its argv to `qsub.log`, hands out increasing job ids starting
//! at 500, and adds each id to `queue`. `qstat` prints a header plus one row
//! per id in `queue`, so emptying that file "finishes" every job.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct FakeGridEngine {
    pub dir: PathBuf,
}

impl FakeGridEngine {
    pub fn install(dir: &Path) -> Self {
        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let state = dir.display();

        let qsub = format!(
            r#"#!/bin/sh
echo "$@" >> "{state}/qsub.log"
n=$(cat "{state}/counter" 2>/dev/null || echo 500)
echo $((n + 1)) > "{state}/counter"
echo "$n" >> "{state}/queue"
echo "Your job $n (\"job\") has been submitted"
"#
        );
        let qstat = format!(
            r#"#!/bin/sh
echo "job-ID  prior   name       user         state submit/start at     queue"
echo "-----------------------------------------------------------------------"
if [ -f "{state}/queue" ]; then
  while read id; do echo "  $id 0.50000 job        tester       qw    10/18/2026 08:00:00"; done < "{state}/queue"
fi
"#
        );
        write_exec(&bin.join("qsub"), &qsub);
        write_exec(&bin.join("qstat"), &qstat);
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn qsub(&self) -> String {
        self.dir.join("bin/qsub").display().to_string()
    }

    pub fn qstat(&self) -> String {
        self.dir.join("bin/qstat").display().to_string()
    }

    /// Argument lines passed to `qsub`, one per submission.
    pub fn qsub_calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.join("qsub.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Mark every job as finished.
    pub fn drain(&self) {
        let _ = fs::remove_file(self.dir.join("queue"));
    }
}

fn write_exec(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}
