use crate::error::{Error, Result};
use rayon::ThreadPool;

/// Returns a rayon thread pool sized to the number of CPUs visible to the
/// process, handling the transient allocation failures the OS may return
/// under load.
///
/// Getting a thread pool might return the error "Resource temporarily
/// unavailable" if the number of processes currently on the system is
/// higher than the limit set in `ulimit -a`. We retry a bounded number of
/// times before giving up.
pub fn get_thread_pool() -> Result<(usize, ThreadPool)> {
    let cpu_number = rayon::current_num_threads();

    let mut attempts_left = 16;
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(cpu_number)
            .build()
        {
            Ok(thread_pool) => return Ok((cpu_number, thread_pool)),
            Err(internal_error) => {
                if attempts_left == 0 {
                    return Err(Error::OutOfMemory(format!(
                        "Unable to allocate a thread pool of {} threads after repeated attempts: {}",
                        cpu_number, internal_error
                    )));
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
                attempts_left -= 1;
            }
        }
    }
}
