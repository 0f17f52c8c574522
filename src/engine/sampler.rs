// ==========================================
// 每周派车分配系统 - 分层随机采样
// ==========================================
// 职责: 层间确定性、层内随机的采样
// 红线: 随机源由调用方注入（可播种,测试可复现）
// ==========================================

use crate::domain::driver::DriverKey;
use rand::seq::SliceRandom;
use rand::Rng;

pub struct TieredSampler;

impl TieredSampler {
    /// 分层采样
    ///
    /// # 规则
    /// 1. 层按给定顺序拼接（层间顺序确定）
    /// 2. 每层内部打乱
    /// 3. 取前 `need` 个
    pub fn sample_tiered<R: Rng + ?Sized>(
        tiers: Vec<Vec<DriverKey>>,
        need: usize,
        rng: &mut R,
    ) -> Vec<DriverKey> {
        if need == 0 {
            return Vec::new();
        }
        let mut chosen = Vec::with_capacity(need);
        for mut tier in tiers {
            tier.shuffle(rng);
            let take = (need - chosen.len()).min(tier.len());
            chosen.extend(tier.into_iter().take(take));
            if chosen.len() >= need {
                break;
            }
        }
        chosen
    }

    /// 单层随机采样
    pub fn sample<R: Rng + ?Sized>(
        pool: Vec<DriverKey>,
        need: usize,
        rng: &mut R,
    ) -> Vec<DriverKey> {
        Self::sample_tiered(vec![pool], need, rng)
    }

    /// 返回打乱后的副本
    pub fn shuffled<R: Rng + ?Sized>(items: &[DriverKey], rng: &mut R) -> Vec<DriverKey> {
        let mut copy = items.to_vec();
        copy.shuffle(rng);
        copy
    }
}
